// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `columbus upload` command implementation.

use std::path::PathBuf;

use colored::Colorize;
use columbus_client::{HttpTransport, UploadFile};
use columbus_core::{ColumbusError, UploadResponse};

use crate::files;
use crate::shell::format_size;

/// Reads `paths` and sends them to the upload endpoint.
///
/// Unreadable or non-image files are reported and skipped; nothing is sent
/// when none remain.
pub async fn run_upload(
    transport: &HttpTransport,
    paths: &[PathBuf],
    store_files: bool,
) -> Result<Option<UploadResponse>, ColumbusError> {
    let (attachments, errors) = files::read_images(paths);
    for err in &errors {
        eprintln!("{}: {err}", "error".red());
    }
    if attachments.is_empty() {
        println!("{}", "nothing to upload".yellow());
        return Ok(None);
    }

    let uploads = attachments
        .iter()
        .map(|a| UploadFile {
            filename: a.display_name().to_string(),
            content_type: a.media_type().to_string(),
            bytes: a.bytes().to_vec(),
        })
        .collect();

    let response = transport.upload(uploads, store_files).await?;
    println!("session: {}", response.session_id.bold());
    for file in &response.files {
        let stored = if file.stored { "stored".green() } else { "not stored".dimmed() };
        println!(
            "  {} {} {} {}",
            file.filename,
            file.content_type.dimmed(),
            format_size(file.size).dimmed(),
            stored
        );
    }
    Ok(Some(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use columbus_client::ApiClient;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn uploads_image_files() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "session_id": "abc123",
                "files": [{
                    "filename": "cat.png",
                    "content_type": "image/png",
                    "size": 3,
                    "stored": false
                }],
                "stored": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("cat.png");
        std::fs::write(&image, [1u8, 2, 3]).unwrap();

        let client = ApiClient::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap();
        let transport = HttpTransport::with_client(client);
        let response = run_upload(&transport, &[image], false).await.unwrap().unwrap();
        assert_eq!(response.session_id, "abc123");
        assert_eq!(response.files.len(), 1);
    }

    #[tokio::test]
    async fn nothing_sent_without_images() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "hi").unwrap();

        let client = ApiClient::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap();
        let transport = HttpTransport::with_client(client);
        assert!(run_upload(&transport, &[text], false).await.unwrap().is_none());
    }
}
