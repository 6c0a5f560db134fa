// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 协议参数与常量模块
//!
//! 该模块定义了服务器遵循的 HTTP 协议相关常量和数据结构，包括：
//! - 端点（Endpoint）前缀表及其匹配顺序。
//! - 支持的响应状态码及其原因短语（Reason Phrase）。
//! - 请求/响应中用到的标头名称与 MIME 类型。

use lazy_static::lazy_static;
use std::fmt;

/// HTTP 协议规定的换行符（Carriage Return Line Feed）
pub const CRLF: &str = "\r\n";

/// 请求头与请求体之间的空行
pub const BLANK_LINE: &[u8] = b"\r\n\r\n";

/// 单次读取请求的缓冲区大小，超出部分会被截断
pub const REQUEST_BUFFER_SIZE: usize = 1024;

/// 默认的 TOML 配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/development.toml";

/// 默认的 log4rs 配置文件路径
pub const LOG_CONFIG_PATH: &str = "config/log4rs.yaml";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONNECTION: &str = "Connection";
pub const USER_AGENT: &str = "User-Agent";
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// 服务器能够识别的端点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// `GET /echo/<text>`
    Echo,
    /// `GET /user-agent`
    UserAgent,
    /// `GET /files/<name>`
    GetFile,
    /// `POST /files/<name>`
    PostFile,
    /// `GET /`
    Base,
    /// 以上都不匹配
    #[default]
    Unknown,
}

lazy_static! {
    /// 请求行前缀与端点的对应表。
    ///
    /// 匹配时会遍历整张表，**最后**一个命中的前缀生效，而不是第一个。
    /// 正常请求下各前缀互斥，该顺序只对畸形请求有意义。
    pub static ref ENDPOINT_PREFIXES: Vec<(&'static str, Endpoint)> = {
        vec![
            ("GET /echo/", Endpoint::Echo),
            ("GET /user-agent", Endpoint::UserAgent),
            ("GET /files/", Endpoint::GetFile),
            ("POST /files/", Endpoint::PostFile),
            ("GET / ", Endpoint::Base),
        ]
    };
}

impl Endpoint {
    /// 返回该端点在请求行中对应的前缀，`Unknown` 没有前缀
    pub fn prefix(&self) -> Option<&'static str> {
        ENDPOINT_PREFIXES
            .iter()
            .find(|(_, endpoint)| endpoint == self)
            .map(|(prefix, _)| *prefix)
    }
}

/// 服务器会返回的响应状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpStatus {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 404 Not Found，未设置状态时的默认值
    #[default]
    NotFound,
}

impl HttpStatus {
    pub fn code(&self) -> u16 {
        match self {
            HttpStatus::Ok => 200,
            HttpStatus::Created => 201,
            HttpStatus::NotFound => 404,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            HttpStatus::Ok => "OK",
            HttpStatus::Created => "Created",
            HttpStatus::NotFound => "Not Found",
        }
    }
}

/// 支持的内容编码（压缩）格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpEncoding {
    /// GNU zip 压缩
    Gzip,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Endpoint::Echo => write!(f, "Echo"),
            Endpoint::UserAgent => write!(f, "UserAgent"),
            Endpoint::GetFile => write!(f, "GetFile"),
            Endpoint::PostFile => write!(f, "PostFile"),
            Endpoint::Base => write!(f, "Base"),
            Endpoint::Unknown => write!(f, "Unknown"),
        }
    }
}

impl fmt::Display for HttpStatus {
    /// 格式化为状态行，例如 `HTTP/1.1 404 Not Found`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/1.1 {} {}", self.code(), self.reason())
    }
}

impl fmt::Display for HttpEncoding {
    /// 将枚举格式化为 `Content-Encoding` 头所使用的标识符
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HttpEncoding::Gzip => write!(f, "gzip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line() {
        assert_eq!(HttpStatus::Ok.to_string(), "HTTP/1.1 200 OK");
        assert_eq!(HttpStatus::Created.to_string(), "HTTP/1.1 201 Created");
        assert_eq!(HttpStatus::NotFound.to_string(), "HTTP/1.1 404 Not Found");
    }

    #[test]
    fn test_status_defaults_to_not_found() {
        assert_eq!(HttpStatus::default(), HttpStatus::NotFound);
    }

    #[test]
    fn test_endpoint_prefix() {
        assert_eq!(Endpoint::Echo.prefix(), Some("GET /echo/"));
        assert_eq!(Endpoint::PostFile.prefix(), Some("POST /files/"));
        assert_eq!(Endpoint::Base.prefix(), Some("GET / "));
        assert_eq!(Endpoint::Unknown.prefix(), None);
    }

    #[test]
    fn test_prefix_table_order() {
        let kinds: Vec<Endpoint> = ENDPOINT_PREFIXES.iter().map(|(_, e)| *e).collect();
        assert_eq!(
            kinds,
            vec![
                Endpoint::Echo,
                Endpoint::UserAgent,
                Endpoint::GetFile,
                Endpoint::PostFile,
                Endpoint::Base,
            ]
        );
    }
}
