//! `tutorius chat` — one tutoring turn from the command line.

use anyhow::bail;

use tutorius_config::AppConfig;
use tutorius_engine::{ChatRequest, Mode};

pub struct ChatArgs {
    pub user: String,
    pub mode: Option<String>,
    pub subject: Option<String>,
    pub subject_id: Option<String>,
    pub topic: Option<String>,
    pub grade: Option<u8>,
    pub message: String,
}

pub async fn run(args: ChatArgs) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    if config.api_key.is_none() {
        super::print_api_key_help();
        bail!("No API key found. See above for setup instructions.");
    }

    let engine = super::build_engine(&config).await?;

    let request = ChatRequest {
        user_id: args.user,
        message: args.message,
        mode: Mode::from_param(args.mode.as_deref()),
        subject_name: args.subject,
        subject_id: args.subject_id,
        topic: args.topic,
        grade: args.grade,
    };

    eprint!("  Galvoju...");
    let result = engine.chat(&request).await;
    eprint!("\r           \r");

    match result {
        Ok(response) => {
            println!("{response}");
            Ok(())
        }
        Err(e) => bail!("{e}"),
    }
}
