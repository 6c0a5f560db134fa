// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 连接处理
//!
//! 每个连接只处理一次请求-响应：读取、解析、构建、序列化、写回、关闭。
//! 不支持 keep-alive，也没有超时。

use crate::{fs::FileSystem, request::Request, response::Response};

use log::{debug, error, info};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::TcpListener,
};

use std::{sync::Arc, time::Instant};

/// # 连接处理器
///
/// 读取失败（包括对端未发送数据就关闭）时直接放弃连接，不发送任何响应。
pub async fn handle_connection<S, F>(stream: &mut S, id: u128, root: &str, fs: &F)
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FileSystem + ?Sized,
{
    let request = match Request::read_from(stream, id).await {
        Ok(req) => req,
        Err(e) => {
            debug!("[ID{}]放弃连接：{}", id, e);
            return;
        }
    };

    let start_time = Instant::now();
    let response = Response::from_request(&request, root, fs, id);
    debug!(
        "[ID{}]HTTP响应构建完成，服务端用时{}ms。",
        id,
        start_time.elapsed().as_millis()
    );

    info!(
        "[ID{}] {}, {}, {}, {}",
        id,
        request.endpoint(),
        request.target(),
        response.status_code(),
        request.user_agent(),
    );

    let response_bytes = response.as_bytes();
    debug!("[ID{}]发送全量响应，长度: {}", id, response_bytes.len());
    if let Err(e) = stream.write_all(&response_bytes).await {
        error!("[ID{}]发送响应失败: {}", id, e);
        return;
    }
    let _ = stream.flush().await;
    let _ = stream.shutdown().await;
}

/// # 主事件循环 (Accept Loop)
///
/// 为每个新连接启动一个独立的任务，不做并发限制。
/// 任务之间只共享只读的基础目录和文件系统。
pub async fn serve<F>(listener: TcpListener, root: String, fs: Arc<F>)
where
    F: FileSystem + 'static,
{
    let root = Arc::new(root);
    let mut id: u128 = 0;

    loop {
        let (mut stream, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("接受连接失败：{}", e);
                continue;
            }
        };
        debug!("[ID{}]新的连接：{}", id, addr);

        let root = Arc::clone(&root);
        let fs = Arc::clone(&fs);
        tokio::spawn(async move {
            handle_connection(&mut stream, id, &root, fs.as_ref()).await;
        });
        id += 1;
    }
}
