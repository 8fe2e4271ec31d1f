use anyhow::{bail, Context, Result};
use cartmapper_client::infrastructure::TracingSpeechEngine;
use cartmapper_client::utils::logging::{log_backend_status, log_document_status, log_startup};
use cartmapper_client::workflow::{Severity, UploadStatus};
use cartmapper_client::{ApiClient, Config, QueryPage, QueryPageState, UploadFile, UploadFlow};
use tracing::info;

/// 命令行子命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Health,
    Documents,
    Upload(Vec<String>),
    Qr { data: String, is_url: bool },
    Ask(String),
}

pub const USAGE: &str = "用法: cartmapper_client <health | docs | upload FILE... | qr DATA [--url] | ask QUESTION...>";

impl Command {
    /// 解析命令行参数（不含程序名）
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            bail!("{}", USAGE);
        };

        match name.as_str() {
            "health" => Ok(Command::Health),
            "docs" => Ok(Command::Documents),
            "upload" if !rest.is_empty() => Ok(Command::Upload(rest.to_vec())),
            "qr" => {
                let is_url = rest.iter().any(|a| a == "--url");
                let data = rest
                    .iter()
                    .filter(|a| a.as_str() != "--url")
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" ");
                Ok(Command::Qr { data, is_url })
            }
            "ask" if !rest.is_empty() => Ok(Command::Ask(rest.join(" "))),
            _ => bail!("{}", USAGE),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    client: ApiClient,
}

impl App {
    pub fn initialize(config: Config) -> Self {
        log_startup(&config);
        let client = ApiClient::new(&config);
        Self { config, client }
    }

    /// 执行命令
    pub async fn run(self, command: Command) -> Result<()> {
        match command {
            Command::Health => {
                let health = self.client.check_health().await;
                println!("{}", serde_json::to_string_pretty(&health)?);
                if !health.is_healthy() {
                    bail!("后端不可用");
                }
            }
            Command::Documents => {
                let status = self.client.check_documents().await;
                log_document_status(&status);
                println!("available: {}", status.available);
                for doc in &status.documents {
                    println!("  - {}", doc);
                }
                if let Some(note) = &status.note {
                    println!("note: {}", note);
                }
            }
            Command::Upload(paths) => {
                let mut files = Vec::with_capacity(paths.len());
                for path in &paths {
                    files.push(
                        UploadFile::from_path(path)
                            .await
                            .with_context(|| format!("读取文件失败: {}", path))?,
                    );
                }
                let outcome = UploadFlow::new(&self.client).upload_all(&files).await;
                info!("已上传 {}/{} 个文件", outcome.uploaded, files.len());
                report(&outcome.status)?;
            }
            Command::Qr { data, is_url } => {
                let status = UploadFlow::new(&self.client).upload_qr(&data, is_url).await;
                report(&status)?;
            }
            Command::Ask(question) => self.ask(question).await?,
        }
        Ok(())
    }

    async fn ask(self, question: String) -> Result<()> {
        let state = QueryPageState::from_config(&self.config);
        let mut page = QueryPage::new(self.client, TracingSpeechEngine, state);

        page.mount().await;
        if let Some(status) = &page.state().backend {
            log_backend_status(status);
        }
        page.ask(question).await;

        let state = page.state();
        if let Some(error) = &state.error {
            let message = error.to_string();
            page.unmount().await;
            bail!("{}", message);
        }

        for line in state.answer_lines() {
            match line.icon {
                Some(icon) => println!("[{}] {}", icon.name(), line.text),
                None => println!("{}", line.text),
            }
        }
        page.unmount().await;
        Ok(())
    }
}

fn report(status: &UploadStatus) -> Result<()> {
    match status.severity {
        Severity::Error => bail!("{}", status.message),
        _ => {
            println!("{}", status.message);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&args(&["health"])).unwrap(), Command::Health);
        assert_eq!(
            Command::parse(&args(&["ask", "how", "much", "milk?"])).unwrap(),
            Command::Ask("how much milk?".to_string())
        );
        assert_eq!(
            Command::parse(&args(&["qr", "--url", "https://a.example/r.pdf"])).unwrap(),
            Command::Qr {
                data: "https://a.example/r.pdf".to_string(),
                is_url: true,
            }
        );
        assert!(Command::parse(&args(&[])).is_err());
        assert!(Command::parse(&args(&["upload"])).is_err());
    }
}
