// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了服务器在请求处理生命周期中可能出现的各类异常情况。
//!
//! 只有读取连接失败会导致连接被直接放弃；其余异常都会在响应构建阶段
//! 被降级为 `404 Not Found`。

use std::{fmt, io};

/// 服务器处理请求过程中发生的异常类型。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exception {
    /// 对端在发送任何字节之前就关闭了连接。
    ConnectionClosed,
    /// 从连接读取请求时发生 I/O 错误。
    ReadFailed(io::ErrorKind),
    /// 在基础目录下未找到所请求的文件（或无法获取其元数据）。
    FileNotFound,
    /// 文件存在，但读取内容失败。
    FileReadFailed,
    /// 写入上传文件失败。
    FileWriteFailed,
    /// 上传文件时 `Content-Type` 不是 `application/octet-stream`。
    WrongContentType,
    /// gzip 压缩响应体失败。
    CompressFailed,
}

use Exception::*;

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionClosed => write!(f, "Connection closed before any bytes were read"),
            ReadFailed(kind) => write!(f, "Failed to read request: {}", kind),
            FileNotFound => write!(f, "File not found (404)"),
            FileReadFailed => write!(f, "Failed to read file"),
            FileWriteFailed => write!(f, "Failed to write file"),
            WrongContentType => write!(f, "Upload content type must be application/octet-stream"),
            CompressFailed => write!(f, "Failed to gzip response body"),
        }
    }
}

impl From<io::Error> for Exception {
    fn from(e: io::Error) -> Self {
        ReadFailed(e.kind())
    }
}
