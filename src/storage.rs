//! Artifact collection and upload to the storage backend.
//!
//! A build output tree is enumerated into a map keyed by path relative to
//! the tree root, then each file is transferred with its own scoped read
//! handle. Descriptor usage stays bounded no matter how large the artifact
//! tree is.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use walkdir::WalkDir;

/// Enumerate every regular file under `input_dir`.
///
/// Keys are paths relative to `input_dir`; each regular file in the subtree
/// appears exactly once. A missing or unreadable directory is an error, not
/// an empty map.
pub fn collect_artifacts(input_dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut artifacts = BTreeMap::new();
    for entry in WalkDir::new(input_dir) {
        let entry =
            entry.with_context(|| format!("walking artifacts under '{}'", input_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel_path = entry.path().strip_prefix(input_dir).with_context(|| {
            format!(
                "artifact '{}' outside '{}'",
                entry.path().display(),
                input_dir.display()
            )
        })?;
        artifacts.insert(rel_path.to_string_lossy().into_owned(), entry.into_path());
    }
    Ok(artifacts)
}

/// Upload every artifact under `input_dir` to the storage backend.
///
/// *api* is the storage API endpoint, *token* the backend API token,
/// *upload_path* the remote target directory. One POST per artifact; the
/// file handle is opened for that transfer and dropped with it. A failed
/// transfer aborts the remaining uploads.
pub fn upload(api: &str, token: &str, upload_path: &str, input_dir: &Path) -> Result<()> {
    let artifacts = collect_artifacts(input_dir)?;
    let client = Client::builder()
        .build()
        .context("creating storage http client")?;

    println!(
        "  Uploading {} artifacts from '{}' to '{}'",
        artifacts.len(),
        input_dir.display(),
        upload_path
    );
    for (rel_path, local_path) in &artifacts {
        upload_artifact(&client, api, token, upload_path, rel_path, local_path)?;
    }
    Ok(())
}

fn upload_artifact(
    client: &Client,
    api: &str,
    token: &str,
    upload_path: &str,
    rel_path: &str,
    local_path: &Path,
) -> Result<()> {
    let file = File::open(local_path)
        .with_context(|| format!("opening artifact '{}'", local_path.display()))?;
    let form = Form::new()
        .text("path", upload_path.to_owned())
        .part("file", Part::reader(file).file_name(rel_path.to_owned()));

    let response = client
        .post(format!("{}/upload", api.trim_end_matches('/')))
        .header("Authorization", token)
        .multipart(form)
        .send()
        .with_context(|| format!("uploading artifact '{}'", rel_path))?;

    if !response.status().is_success() {
        bail!(
            "upload of '{}' failed with status {}",
            rel_path,
            response.status()
        );
    }
    Ok(())
}
