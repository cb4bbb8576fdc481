use anyhow::Result;
use forms_admin::orchestrator::{App, Command, USAGE};
use forms_admin::{logger, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    // 初始化并运行应用
    App::initialize(config).await?.run(command).await?;

    Ok(())
}
