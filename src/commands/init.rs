//! # Pipeline Initialization Module / 流水线初始化模块
//!
//! This module provides functionality for initializing a `MatrixForge.toml`
//! configuration file through an interactive command-line wizard, with a
//! non-interactive path that writes the stock defaults.
//!
//! 此模块通过交互式命令行向导提供初始化 `MatrixForge.toml` 配置文件的功能，
//! 并提供写入标准默认值的非交互路径。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Step-by-step guidance for configuration setup
//! - **Overwrite Protection**: Confirmation prompts before overwriting an
//!   existing configuration
//!
//! - **交互式向导**: 配置设置的逐步指导
//! - **覆盖保护**: 覆盖现有配置前的确认提示

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{DEFAULT_CONFIG_FILE, MatrixConfig};
use crate::core::models::{Browser, Device};

/// Runs the interactive wizard to generate a `MatrixForge.toml` file.
///
/// 运行交互式向导以生成 `MatrixForge.toml` 文件。
pub fn run_init_wizard(non_interactive: bool) -> Result<()> {
    let config_path = Path::new(DEFAULT_CONFIG_FILE);
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", "Welcome to the matrix-forge setup wizard!".cyan().bold());
        println!("This will create a {} file for your test suite.", DEFAULT_CONFIG_FILE);
    }

    if config_path.exists() && !non_interactive {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(format!("{DEFAULT_CONFIG_FILE} already exists. Overwrite it?"))
            .default(false)
            .interact()
            .context("failed to read user confirmation")?;
        if !confirmation {
            println!("Aborted; the existing configuration was left untouched.");
            return Ok(());
        }
    }

    let mut config = MatrixConfig::default();

    if non_interactive {
        write_config(config_path, &config)?;
        return Ok(());
    }

    config.framework = Input::with_theme(&theme)
        .with_prompt("Test framework command")
        .default(config.framework)
        .interact_text()
        .context("failed to read framework input")?;

    config.language = Input::with_theme(&theme)
        .with_prompt("Test suite language")
        .default(config.language)
        .interact_text()
        .context("failed to read language input")?;

    config.browsers = select_subset(
        &theme,
        "Browsers for the e2e grid",
        Browser::defaults(),
    )?;
    config.devices = select_subset(
        &theme,
        "Devices for the e2e grid",
        Device::defaults(),
    )?;

    config.strict = Confirm::with_theme(&theme)
        .with_prompt("Fail matrix generation when the test base path is missing?")
        .default(true)
        .interact()
        .context("failed to read strict-mode confirmation")?;

    write_config(config_path, &config)
}

/// Presents a multi-select over the stock set; selecting nothing keeps the
/// full set rather than producing a degenerate empty grid.
/// 在标准集合上提供多选；不选择任何项时保留完整集合，
/// 而不是产生退化的空网格。
fn select_subset<T>(theme: &ColorfulTheme, prompt: &str, all: Vec<T>) -> Result<Vec<T>>
where
    T: Copy + std::fmt::Display,
{
    let labels: Vec<String> = all.iter().map(|item| item.to_string()).collect();
    let defaults = vec![true; all.len()];

    let selections = MultiSelect::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .context("failed to read selection")?;

    if selections.is_empty() {
        println!("{}", "Nothing selected, keeping the full set.".yellow());
        return Ok(all);
    }

    Ok(selections.into_iter().map(|index| all[index]).collect())
}

fn write_config(path: &Path, config: &MatrixConfig) -> Result<()> {
    let content =
        toml::to_string_pretty(config).context("failed to serialize configuration")?;
    fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;
    println!(
        "\n{} {}",
        "Configuration written to".green(),
        path.display().to_string().green().bold()
    );
    Ok(())
}
