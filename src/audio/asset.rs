use std::fs::File;
use std::path::{Path, PathBuf};

const SYSTEM_ASSET_DIR: &str = "/usr/share/pulsepage/assets";

/// Open a media asset, trying the path as given, then `assets/`, then the system asset dir
pub fn open_asset(path: &Path) -> std::io::Result<File> {
    File::open(path)
        .or_else(|_| File::open(PathBuf::from("assets").join(path)))
        .or_else(|_| File::open(PathBuf::from(SYSTEM_ASSET_DIR).join(path)))
}
