// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 异步 Web 服务器
//!
//! 基于 Tokio 运行时的多线程 HTTP/1.1 服务器，提供：
//! - `/echo/<text>` 回显（支持 gzip）
//! - `/user-agent` 回显客户端标识
//! - `/files/<name>` 文件下载与上传
//!
//! 每个连接只处理一次请求，处理完毕即关闭。

use clap::Parser;
use minihttpd::{param::LOG_CONFIG_PATH, server, Args, Config, LocalFileSystem};

use log::{error, info, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};
use tokio::{net::TcpListener, runtime::Builder};

use std::{
    net::{Ipv4Addr, SocketAddrV4},
    process,
    sync::Arc,
};

/// # 程序入口点
///
/// 初始化日志、加载配置、构建运行时并启动主事件循环。
fn main() {
    // 1. 初始化日志系统：优先使用外部 YAML 配置，缺失时退回到控制台输出
    init_logging();

    // 2. 配置加载：TOML 文件 + 命令行参数覆盖
    let args = Args::parse();
    let config = Config::from_args(&args);
    info!("配置文件已载入");
    info!("基础目录: {}", config.directory());

    // 3. 异步运行时定制：根据配置文件分配工作线程数
    let runtime = match Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("无法创建Tokio运行时：{}", e);
            process::exit(1);
        }
    };

    runtime.block_on(run(config));
}

async fn run(config: Config) {
    let port = config.port();
    let address = match config.local() {
        true => Ipv4Addr::new(127, 0, 0, 1),
        false => Ipv4Addr::new(0, 0, 0, 0),
    };
    let socket = SocketAddrV4::new(address, port);

    let listener = match TcpListener::bind(socket).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("无法绑定端口：{}，错误：{}", port, e);
            process::exit(1);
        }
    };
    info!("服务端在{}上监听Socket连接", socket);

    server::serve(
        listener,
        config.directory().to_string(),
        Arc::new(LocalFileSystem),
    )
    .await;
}

fn init_logging() {
    if log4rs::init_file(LOG_CONFIG_PATH, Default::default()).is_ok() {
        return;
    }

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} - {m}{n}",
        )))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));
    match config {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("无法初始化日志系统：{}", e);
            }
        }
        Err(e) => eprintln!("日志配置无效：{}", e),
    }
}
