// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求处理模块
//!
//! 负责将连接上单次读取到的原始字节解析为 `Request` 结构体。它涵盖了：
//! 1. 请求头与请求体的切分。
//! 2. 请求行的端点分类与目标（Target）提取。
//! 3. 常用 HTTP 标头的提取。

use crate::{exception::Exception, param::*};
use log::{debug, error};
use tokio::io::{AsyncRead, AsyncReadExt};

/// 表示一个已解析的 HTTP 请求。
///
/// 每个连接只构建一次，构建后不可变。
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// 请求行匹配到的端点
    endpoint: Endpoint,
    /// 去掉端点前缀后的目标字符串
    target: String,
    /// 客户端标识字符串
    user_agent: String,
    /// 客户端支持的压缩编码列表（按解析顺序排列）
    accept_encoding: Vec<HttpEncoding>,
    content_type: String,
    /// `Connection` 标头的原始值，服务器本身不解释它
    connection: String,
    body: Vec<u8>,
}

impl Request {
    /// 从连接上读取一次（最多 `REQUEST_BUFFER_SIZE` 字节）并解析。
    ///
    /// 超出缓冲区的部分会被截断。读取出错，或者对端在发送任何字节前
    /// 就关闭了连接，都会返回错误，调用方应直接放弃该连接。
    pub async fn read_from<S>(stream: &mut S, id: u128) -> Result<Self, Exception>
    where
        S: AsyncRead + Unpin,
    {
        let mut buffer = vec![0; REQUEST_BUFFER_SIZE];
        let n = match stream.read(&mut buffer).await {
            Ok(0) => {
                debug!("[ID{}]客户端未发送任何数据即关闭连接", id);
                return Err(Exception::ConnectionClosed);
            }
            Ok(n) => n,
            Err(e) => {
                error!("[ID{}]读取TCPStream时遇到错误: {}", id, e);
                return Err(e.into());
            }
        };
        debug!("[ID{}]HTTP请求接收完毕，共{}字节", id, n);
        Ok(Self::parse(&buffer[..n], id))
    }

    /// 从原始字节缓冲区构建 `Request` 实例。
    ///
    /// # 逻辑步骤
    /// 1. 在第一个空行处切分请求头与请求体，请求体保留原始字节。
    /// 2. 用前缀表对请求行分类，最后一个命中的前缀生效。
    /// 3. 从**整个缓冲区**开头去掉命中的前缀，取到下一个空格为止作为目标。
    /// 4. 逐行解析标头，无法按 `": "` 恰好切成两段的行直接忽略。
    ///    标头名区分大小写，只识别规范写法。
    pub fn parse(buffer: &[u8], id: u128) -> Self {
        let (head, body) = match find_subsequence(buffer, BLANK_LINE) {
            Some(pos) => (&buffer[..pos], buffer[pos + BLANK_LINE.len()..].to_vec()),
            None => (buffer, Vec::new()),
        };
        let head = String::from_utf8_lossy(head);
        let mut lines = head.split(CRLF);
        let request_line = lines.next().unwrap_or("");

        let endpoint = classify(request_line);
        let raw = String::from_utf8_lossy(buffer);
        let target = extract_target(&raw, endpoint);
        debug!("[ID{}]端点：{}，目标：{}", id, endpoint, target);

        let mut request = Self {
            endpoint,
            target,
            body,
            ..Default::default()
        };

        for line in lines {
            let pair: Vec<&str> = line.split(": ").collect();
            if pair.len() != 2 {
                continue;
            }
            let (name, value) = (pair[0], pair[1]);
            match name {
                CONTENT_TYPE => request.content_type = value.to_string(),
                USER_AGENT => request.user_agent = value.to_string(),
                ACCEPT_ENCODING => {
                    for token in value.split(',') {
                        if token.replace(' ', "") == "gzip" {
                            request.accept_encoding.push(HttpEncoding::Gzip);
                        }
                    }
                }
                CONNECTION => request.connection = value.to_string(),
                _ => {}
            }
        }

        request
    }
}

/// 遍历整张前缀表，返回最后一个命中的端点
fn classify(request_line: &str) -> Endpoint {
    let mut endpoint = Endpoint::Unknown;
    for (prefix, kind) in ENDPOINT_PREFIXES.iter() {
        if request_line.starts_with(prefix) {
            endpoint = *kind;
        }
    }
    endpoint
}

fn extract_target(raw: &str, endpoint: Endpoint) -> String {
    let rest = match endpoint.prefix() {
        Some(prefix) => raw.strip_prefix(prefix).unwrap_or(raw),
        None => raw,
    };
    rest.split(' ').next().unwrap_or("").to_string()
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

// --- Getter 访问器实现 ---

impl Request {
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// 获取用户代理字符串，可能为空
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// 获取客户端支持的压缩算法列表
    pub fn accept_encoding(&self) -> &[HttpEncoding] {
        &self.accept_encoding
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn connection(&self) -> &str {
        &self.connection
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
