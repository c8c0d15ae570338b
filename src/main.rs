use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{error, info};

use twig_asset_bundler::manifest::DEFAULT_MANIFEST_FILE;
use twig_asset_bundler::{DirectoryHost, PluginConfigFile, TemplateAssetPlugin};

/// Copy assets referenced from templates into a build directory under hashed names.
#[derive(Debug, Parser)]
#[command(name = "twig-assets", version, about)]
struct Cli {
  /// Configuration file, defaults to ./twig-assets.config.json when present.
  #[arg(long)]
  config: Option<PathBuf>,
  /// Directory scanned for templates.
  #[arg(long)]
  template_path: Option<PathBuf>,
  /// Directory references are resolved against.
  #[arg(long)]
  asset_path: Option<PathBuf>,
  /// Directory artifacts and the manifest are written to.
  #[arg(long, short)]
  output: Option<PathBuf>,
  /// Output naming template, must end with [ext].
  #[arg(long)]
  filename: Option<String>,
  /// Primary output template of the surrounding build, e.g. "[name].[contenthash].js".
  #[arg(long)]
  host_template: Option<String>,
  /// Request already produced by the surrounding build, as KEY=SOURCE. Repeatable.
  #[arg(long = "produced", value_name = "KEY=SOURCE", value_parser = parse_produced)]
  produced: Vec<(String, PathBuf)>,
  /// Manifest file name inside the output directory.
  #[arg(long, default_value = DEFAULT_MANIFEST_FILE)]
  manifest: String,
}

fn parse_produced(value: &str) -> Result<(String, PathBuf), String> {
  let (key, source) = value
    .split_once('=')
    .ok_or_else(|| format!("expected KEY=SOURCE, got \"{value}\""))?;
  if key.is_empty() {
    return Err(format!("empty request key in \"{value}\""));
  }
  Ok((key.to_string(), PathBuf::from(source)))
}

fn main() -> Result<ExitCode> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let cli = Cli::parse();
  let mut config = match cli.config.as_deref() {
    Some(path) => PluginConfigFile::from_path(path)?,
    None => {
      let cwd = std::env::current_dir().context("failed to resolve the working directory")?;
      PluginConfigFile::discover(&cwd)?.unwrap_or_default()
    }
  };

  if cli.template_path.is_some() {
    config.template_path = cli.template_path;
  }
  if cli.asset_path.is_some() {
    config.asset_path = cli.asset_path;
  }
  if cli.output.is_some() {
    config.output_path = cli.output;
  }
  if cli.filename.is_some() {
    config.filename = cli.filename;
  }
  if cli.host_template.is_some() {
    config.output_filename = cli.host_template;
  }

  let output_path = config
    .output_path
    .clone()
    .ok_or_else(|| anyhow!("missing output directory, pass --output or set 'outputPath'"))?;
  let host_template = config.output_filename.clone();

  let plugin = TemplateAssetPlugin::new(config.into_options()?)?;
  let mut pass = plugin
    .begin_pass()
    .context("failed to discover asset references")?;

  let mut host = DirectoryHost::new(&output_path, host_template);
  for (key, source) in cli.produced {
    host.register_output(key.clone(), key.clone());
    pass.report_produced_output(key, source);
  }

  let report = pass.process_assets(&mut host);
  let manifest_path = host.write_manifest(&cli.manifest)?;
  info!(
    "wrote {} asset(s) and {}",
    report.emitted.len(),
    manifest_path.display()
  );

  if host.errors().is_empty() {
    return Ok(ExitCode::SUCCESS);
  }

  for asset_error in host.errors() {
    error!("{asset_error}");
  }
  Ok(ExitCode::FAILURE)
}
