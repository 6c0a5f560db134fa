// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 文件系统访问
//!
//! `/files/` 端点只需要三个操作：获取大小、读取、写入。
//! 把它们放在 `FileSystem` trait 后面，测试时可以替换为 mock。

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

#[cfg_attr(test, mockall::automock)]
pub trait FileSystem: Send + Sync {
    /// 返回文件大小（字节）
    fn stat(&self, path: &Path) -> io::Result<u64>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// 创建或覆盖文件
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;
}

/// 基于 `std::fs` 的本地磁盘实现
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn stat(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        fs::write(path, content)
    }
}

/// 将客户端提供的目标名拼接到基础目录下。
///
/// 去除目标开头的 `/`，保证结果总是基础目录的子路径；
/// 不会处理 `..`，目录遍历不在此处防御。
pub fn resolve(root: &str, target: &str) -> PathBuf {
    let target = target.trim_start_matches('/');
    Path::new(root).join(target)
}
