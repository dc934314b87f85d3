use anyhow::Context;
use gpt_assist::{AssistClient, ClientOptions};
use kikaku_core::config::Config;
use std::path::Path;

/// Build the assist client from config + environment. A missing API key is
/// not fatal: the server runs, the assist routes answer 503.
fn build_assist(root: &Path, disabled: bool) -> anyhow::Result<Option<AssistClient>> {
    if disabled {
        return Ok(None);
    }

    let config = Config::load_or_default(root).context("failed to load config")?;
    let assist = &config.assist;
    let options = ClientOptions {
        base_url: assist.base_url.clone(),
        api_key: String::new(),
        word_model: assist.word_model.clone(),
        concept_model: assist.concept_model.clone(),
        word_temperature: assist.word_temperature,
        concept_temperature: assist.concept_temperature,
    };

    match AssistClient::from_env(options, &assist.api_key_env) {
        Ok(client) => Ok(Some(client)),
        Err(e) => {
            tracing::warn!("{e}; assist endpoints will be unavailable");
            Ok(None)
        }
    }
}

pub fn run(root: &Path, port: u16, no_assist: bool) -> anyhow::Result<()> {
    kikaku_core::io::ensure_dir(root).context("failed to create data root")?;
    let assist = build_assist(root, no_assist)?;

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();
    rt.block_on(async move { kikaku_server::serve(root_buf, port, assist).await })
}
