use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use aurelia_docs::config::{read_config, Config, CFG_FILE_NAME};

fn get_config_path() -> Option<PathBuf> {
    let cur_dir = env::current_dir().ok();
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let cfg_dir = dirs::config_dir();

    [cur_dir, exe_dir, cfg_dir]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path.or_else(get_config_path) {
        Some(path) => path,
        None => return Err(anyhow!("Could not find {} in the current dir, next to the executable or in the user config dir", CFG_FILE_NAME)),
    };

    println!("Reading config from {}", config_path.display());
    read_config(&config_path).with_context(|| format!("Error loading {}", config_path.display()))
}
