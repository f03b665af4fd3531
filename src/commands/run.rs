use crate::args::RunArgs;
use crate::commands::Out;
use crate::session::{Session, Summary};
use crate::{Config, Result};
use anyhow::Context;
use tokio::io::BufReader;

/// Runs a budgeting session, reading commands from the `--script` file or else from stdin, and
/// printing pages to stdout.
pub async fn run(config: Config, args: &RunArgs) -> Result<Out<Summary>> {
    let today = chrono::Local::now().date_naive();
    let mut session = Session::new(&config, args.json(), today);
    let mut stdout = tokio::io::stdout();

    let summary = match args.script() {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Unable to open the script at {}", path.display()))?;
            session.run(BufReader::new(file), &mut stdout).await?
        }
        None => {
            session
                .run(BufReader::new(tokio::io::stdin()), &mut stdout)
                .await?
        }
    };

    let message = format!(
        "Session ended: {} line{} read, {} applied, {} rejected",
        summary.lines,
        if summary.lines == 1 { "" } else { "s" },
        summary.applied,
        summary.rejected
    );
    Ok(Out::new(message, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_run_script_file() {
        let env = TestEnv::new().await;
        let script = env.config().root().join("script.txt");
        tokio::fs::write(&script, "add income 10 Gift\nadd expense 4 Cake\nnope\n")
            .await
            .unwrap();

        let args = RunArgs::new(Some(script), false);
        let out = run(env.config(), &args).await.unwrap();
        assert_eq!(
            out.structure(),
            Some(&Summary {
                lines: 3,
                applied: 2,
                rejected: 1,
            })
        );
        assert!(out.message().contains("3 lines read"));
    }

    #[tokio::test]
    async fn test_run_missing_script() {
        let env = TestEnv::new().await;
        let args = RunArgs::new(Some(env.config().root().join("missing.txt")), false);
        let result = run(env.config(), &args).await;
        assert!(result.unwrap_err().to_string().contains("Unable to open"));
    }
}
