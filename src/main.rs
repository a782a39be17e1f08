use clap::Parser;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};

use track_forwarder::cli::{Args, Config};
use track_forwarder::error::Result;
use track_forwarder::event::EventReader;
use track_forwarder::forwarder::ForwarderFactory;
use track_forwarder::identity::{HashedAnonymousIdProvider, StaticUserDirectory};
use track_forwarder::monitor::ForwardingMonitor;
use track_forwarder::startup;

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 加载配置
    let config = Config::from_file(&args.config)?;

    // 初始化日志，命令行参数优先于配置文件
    let log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    env_logger::Builder::new()
        .filter_level(log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    let anonymizer = Arc::new(HashedAnonymousIdProvider::new(
        config.identity.anonymous_id_secret.clone(),
    ));
    if config.identity.anonymous_id_secret.is_empty() {
        warn!("identity.anonymous_id_secret is empty, anonymous ids are only salted by user id");
    }

    // 平台启动
    let platform = startup::run(&config.platform, anonymizer.clone())?;
    info!(
        "Template dirs: {:?}, keywords: {:?}",
        platform.template_dirs, platform.keywords
    );

    let directory = Arc::new(StaticUserDirectory::new(config.identity.users.clone()));
    info!("Loaded {} users into the user directory", directory.len());

    // 创建转发器
    let forwarder = ForwarderFactory::create(&config.forwarder, directory, anonymizer)?;

    // 创建通道
    let (tx, mut rx) = tokio::sync::mpsc::channel(config.forwarder.queue_size.max(1));

    let (input, source_name): (Box<dyn AsyncBufRead + Unpin + Send>, String) = match &args.events {
        Some(path) => (
            Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
            path.display().to_string(),
        ),
        None => (Box::new(BufReader::new(tokio::io::stdin())), "stdin".to_string()),
    };
    let reader = EventReader::new(input, tx, source_name);

    // 启动读取任务
    let read_handle = tokio::spawn(async move {
        match reader.read_loop().await {
            Ok(count) => info!("Finished reading {} events", count),
            Err(e) => error!("Event reader error: {}", e),
        }
    });

    // 启动转发任务
    let monitor = Arc::new(ForwardingMonitor::new());
    let forward_monitor = monitor.clone();
    let forward_handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let outcome = forwarder.forward(&event).await;
            forward_monitor.record(outcome);
        }
    });

    // 等待任务完成
    tokio::try_join!(read_handle, forward_handle)?;

    info!("Forwarding finished: {:?}", monitor.snapshot());
    Ok(())
}
