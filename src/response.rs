// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 响应模块
//!
//! 根据 `Request` 的端点分派到对应的处理分支，构建 `Response`，
//! 并负责将其序列化为发送到连接上的字节。
//!
//! 所有处理失败（文件不存在、Content-Type 不对、写入失败、压缩失败）
//! 都降级为 `404 Not Found`，不存在 5xx。

use crate::{
    exception::Exception,
    fs::{resolve, FileSystem},
    param::*,
    request::Request,
};

use bytes::Bytes;
use flate2::{write::GzEncoder, Compression};
use log::{debug, warn};

use std::io::{self, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    status: HttpStatus,
    content_type: Option<String>,
    content_length: Option<u64>,
    content_encoding: Option<HttpEncoding>,
    /// 原样回传请求中的 `Connection` 值
    connection: Option<String>,
    content: Bytes,
}

impl Response {
    /// 新建一个空响应，状态默认为 404
    pub fn new() -> Self {
        Self::default()
    }

    /// # 响应构建入口
    ///
    /// 按端点分派：
    /// - `Echo` -> 回显目标字符串，客户端支持时进行 gzip 压缩
    /// - `UserAgent` -> 回显 `User-Agent`
    /// - `GetFile` / `PostFile` -> 在 `root` 下读取或写入文件
    /// - `Base` -> 空的 200
    /// - `Unknown` -> 404
    ///
    /// 无论哪个分支，请求中的 `Connection` 都会被原样带到响应中。
    pub fn from_request<F>(request: &Request, root: &str, fs: &F, id: u128) -> Self
    where
        F: FileSystem + ?Sized,
    {
        let mut response = match request.endpoint() {
            Endpoint::Echo => Self::from_echo(request, id),
            Endpoint::UserAgent => Self::from_text(request.user_agent().as_bytes()),
            Endpoint::GetFile => match Self::from_file(request, root, fs, id) {
                Ok(response) => response,
                Err(e) => {
                    warn!("[ID{}]读取文件{}失败：{}，返回404", id, request.target(), e);
                    Self::new()
                }
            },
            Endpoint::PostFile => match Self::from_upload(request, root, fs, id) {
                Ok(response) => response,
                Err(e) => {
                    warn!("[ID{}]上传文件{}失败：{}，返回404", id, request.target(), e);
                    Self::new()
                }
            },
            Endpoint::Base => Self::new().set_status(HttpStatus::Ok).to_owned(),
            Endpoint::Unknown => {
                debug!("[ID{}]未知端点，返回404", id);
                Self::new()
            }
        };

        if !request.connection().is_empty() {
            response.connection = Some(request.connection().to_string());
        }
        response
    }

    fn from_text(text: &[u8]) -> Self {
        let mut response = Self::new();
        response
            .set_status(HttpStatus::Ok)
            .set_content_type(TEXT_PLAIN)
            .set_content(Bytes::copy_from_slice(text));
        response
    }

    fn from_echo(request: &Request, id: u128) -> Self {
        let mut response = Self::from_text(request.target().as_bytes());
        if request.accept_encoding().contains(&HttpEncoding::Gzip) {
            debug!("[ID{}]使用Gzip压缩编码", id);
            let compressed = compress(&response.content);
            response.apply_compression(compressed, id);
        }
        response
    }

    /// 压缩失败时只把状态改回 404，已经写入的其余字段保持不变
    fn apply_compression(&mut self, compressed: io::Result<Vec<u8>>, id: u128) -> &mut Self {
        match compressed {
            Ok(compressed) => {
                self.content_encoding = Some(HttpEncoding::Gzip);
                self.set_content(Bytes::from(compressed));
            }
            Err(e) => {
                warn!("[ID{}]{}：{}", id, Exception::CompressFailed, e);
                self.set_status(HttpStatus::NotFound);
            }
        }
        self
    }

    /// 先获取大小再读取内容，两次调用之间文件可能被修改，
    /// 此时 `Content-Length` 与实际内容长度可能不一致。
    fn from_file<F>(request: &Request, root: &str, fs: &F, id: u128) -> Result<Self, Exception>
    where
        F: FileSystem + ?Sized,
    {
        let path = resolve(root, request.target());
        debug!("[ID{}]映射物理路径：{}", id, path.display());

        let size = fs.stat(&path).map_err(|_| Exception::FileNotFound)?;
        let content = fs.read(&path).map_err(|_| Exception::FileReadFailed)?;

        let mut response = Self::new();
        response
            .set_status(HttpStatus::Ok)
            .set_content_type(OCTET_STREAM);
        response.content = Bytes::from(content);
        response.content_length = Some(size);
        Ok(response)
    }

    fn from_upload<F>(request: &Request, root: &str, fs: &F, id: u128) -> Result<Self, Exception>
    where
        F: FileSystem + ?Sized,
    {
        if request.content_type() != OCTET_STREAM {
            return Err(Exception::WrongContentType);
        }

        let path = resolve(root, request.target());
        debug!("[ID{}]写入{}字节到：{}", id, request.body().len(), path.display());
        fs.write(&path, request.body())
            .map_err(|_| Exception::FileWriteFailed)?;

        Ok(Self::new().set_status(HttpStatus::Created).to_owned())
    }

    fn set_status(&mut self, status: HttpStatus) -> &mut Self {
        self.status = status;
        self
    }

    fn set_content_type(&mut self, content_type: &str) -> &mut Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// 设置响应体并同步 `Content-Length`
    fn set_content(&mut self, content: Bytes) -> &mut Self {
        self.content_length = Some(content.len() as u64);
        self.content = content;
        self
    }

    /// 按固定顺序列出需要发送的标头，值为空或为 0 的标头不发送
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(4);
        if let Some(t) = self.content_type.as_ref().filter(|t| !t.is_empty()) {
            headers.push((CONTENT_TYPE, t.clone()));
        }
        if let Some(len) = self.content_length.filter(|&len| len > 0) {
            headers.push((CONTENT_LENGTH, len.to_string()));
        }
        if let Some(e) = self.content_encoding {
            headers.push((CONTENT_ENCODING, e.to_string()));
        }
        if let Some(c) = self.connection.as_ref().filter(|c| !c.is_empty()) {
            headers.push((CONNECTION, c.clone()));
        }
        headers
    }

    /// 序列化为状态行、标头、空行和响应体
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut header = self.status.to_string();
        header.push_str(CRLF);
        for (name, value) in self.headers() {
            header.push_str(&[name, ": ", &value, CRLF].concat());
        }
        header.push_str(CRLF);
        [header.as_bytes(), &self.content[..]].concat()
    }
}

impl Response {
    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content_encoding(&self) -> Option<HttpEncoding> {
        self.content_encoding
    }

    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }
}

fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    debug!(
        "压缩完成: 原始大小: {} bytes, 压缩后: {} bytes",
        data.len(),
        compressed.len()
    );
    Ok(compressed)
}
