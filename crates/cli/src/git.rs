//! Thin wrappers over the git binary.
//!
//! Every operation maps to one or two git invocations; non-zero exits
//! surface as fatal errors with a fixed message per operation.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::OnceLock;
use tracing::debug;

/// Version described by the last reachable `v*` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub version: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub new_commits_count: u64,
}

fn run(path: &Path, args: &[&str]) -> Result<bool> {
    debug!(path = %path.display(), args = ?args, "Running git");
    let status = Command::new("git")
        .args(args)
        .current_dir(path)
        .status()
        .with_context(|| format!("Failed to spawn git {}", args.join(" ")))?;
    Ok(status.success())
}

fn run_captured(path: &Path, args: &[&str]) -> Result<Output> {
    debug!(path = %path.display(), args = ?args, "Running git");
    Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .with_context(|| format!("Failed to spawn git {}", args.join(" ")))
}

pub fn init(path: &Path, remote_url: Option<&str>) -> Result<()> {
    if !run(path, &["init"])? {
        bail!("Can't init repository");
    }
    if let Some(url) = remote_url {
        if !add_remote(path, "origin", url)? {
            bail!("Can't add remote");
        }
    }
    Ok(())
}

pub fn clone_repository(path: &Path, clone_url: &str) -> Result<()> {
    if !run(path, &["clone", clone_url])? {
        bail!("Can't clone repository");
    }
    Ok(())
}

pub fn pull_repository(path: &Path) -> Result<bool> {
    run(path, &["pull"])
}

pub fn add_remote(path: &Path, remote_name: &str, remote_url: &str) -> Result<bool> {
    run(path, &["remote", "add", remote_name, remote_url])
}

pub fn remove_remote(path: &Path, remote_name: &str) -> Result<bool> {
    run(path, &["remote", "rm", remote_name])
}

/// Remote name -> action (`fetch`/`push`) -> url.
pub fn get_remotes(path: &Path) -> Result<HashMap<String, HashMap<String, String>>> {
    let output = run_captured(path, &["remote", "-v"])?;
    if !output.status.success() {
        bail!("Can't get remotes");
    }
    Ok(parse_remotes(&String::from_utf8_lossy(&output.stdout)))
}

pub fn commit(path: &Path, message: &str) -> Result<bool> {
    Ok(run(path, &["add", "."])? && run(path, &["commit", "-m", message])?)
}

pub fn push(path: &Path) -> Result<bool> {
    run(path, &["push"])
}

/// Porcelain status output; empty means a clean tree.
pub fn get_changes(path: &Path) -> Result<String> {
    let output = run_captured(path, &["status", "--porcelain"])?;
    if !output.status.success() {
        bail!("Can't get repository status");
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `None` when no `v*` tag is reachable.
pub fn tag_info(path: &Path) -> Result<Option<TagInfo>> {
    let output = run_captured(path, &["describe", "--tags", "--long", "--match", "v*"])?;
    if !output.status.success() {
        return Ok(None);
    }
    Ok(parse_tag_description(&String::from_utf8_lossy(&output.stdout)))
}

pub fn add_tag(path: &Path, tag: &str) -> Result<()> {
    if !(run(path, &["tag", tag])? && run(path, &["push", "--tags"])?) {
        bail!("Failed git add tag");
    }
    Ok(())
}

fn parse_remotes(output: &str) -> HashMap<String, HashMap<String, String>> {
    static REMOTE_RE: OnceLock<Regex> = OnceLock::new();
    let re = REMOTE_RE.get_or_init(|| Regex::new(r"(\S+)\s+(\S+)\s+\((\w+)\)").unwrap());

    let mut remotes: HashMap<String, HashMap<String, String>> = HashMap::new();
    for captures in re.captures_iter(output) {
        remotes
            .entry(captures[1].to_string())
            .or_default()
            .insert(captures[3].to_string(), captures[2].to_string());
    }
    remotes
}

fn parse_tag_description(description: &str) -> Option<TagInfo> {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let re = TAG_RE
        .get_or_init(|| Regex::new(r"v((\d+)\.(\d+)\.(\d+))-(\d+)-\w+").unwrap());

    let captures = re.captures(description)?;
    Some(TagInfo {
        version: captures[1].to_string(),
        major: captures[2].parse().ok()?,
        minor: captures[3].parse().ok()?,
        patch: captures[4].parse().ok()?,
        new_commits_count: captures[5].parse().ok()?,
    })
}
