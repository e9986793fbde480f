//! Environment overlay derived from a configuration record.

use crate::host::Platform;
use crate::model::Config;
use std::collections::BTreeMap;

pub const CUSTOM_API_KEY: &str = "CUSTOM_API_KEY";
pub const CUSTOM_API_BASE_URL: &str = "CUSTOM_API_BASE_URL";
pub const CUDA_VISIBLE_DEVICES: &str = "CUDA_VISIBLE_DEVICES";

/// Variables added on top of the launcher's inherited environment.
pub type EnvOverlay = BTreeMap<String, String>;

/// Comma-joined device indices `0..count`.
pub fn visible_devices(count: u32) -> String {
    (0..count)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn derive(config: &Config, platform: Platform) -> EnvOverlay {
    let mut env = EnvOverlay::new();

    if let (true, Some(endpoint)) = (config.is_custom(), config.custom_endpoint()) {
        env.insert(CUSTOM_API_KEY.into(), endpoint.api_key.clone());
        env.insert(CUSTOM_API_BASE_URL.into(), endpoint.api_base_url.clone());
    }

    let temp = &config.system.temp_directory;
    env.insert("TEMP".into(), temp.clone());
    match platform {
        Platform::Windows => env.insert("TMP".into(), temp.clone()),
        Platform::Unix => env.insert("TMPDIR".into(), temp.clone()),
    };

    let parallel = config.experiment.parallel_processes;
    if parallel > 0 && config.system.use_gpu {
        env.insert(CUDA_VISIBLE_DEVICES.into(), visible_devices(parallel));
    }

    env
}
