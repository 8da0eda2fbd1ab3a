#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-png-body";
pub const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-body";

pub fn muse_cmd() -> Command {
    let mut cmd = Command::cargo_bin("muse").unwrap();
    cmd.env_remove("MUSE_ROOT");
    cmd.env_remove("MUSE_PASSWORD");
    cmd.env_remove("MUSE_CREATOR_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Initialize a site in `root` and drop two image files next to it
pub fn init_site(root: &Path) {
    muse_cmd().arg("init").arg(root).assert().success();
    fs::write(root.join("title.png"), PNG).unwrap();
    fs::write(root.join("comic.jpg"), JPEG).unwrap();
}

pub fn data_dir(root: &Path) -> PathBuf {
    root.join("public/data/muses")
}

pub fn publish(root: &Path, date: &str, title: &str) -> assert_cmd::assert::Assert {
    muse_cmd()
        .current_dir(root)
        .args(["publish", "--date", date, "--title", title, "--episode", "#01"])
        .args(["--title-image", "title.png", "--comic-image", "comic.jpg"])
        .assert()
}
