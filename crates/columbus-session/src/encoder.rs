// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of pending attachments into their wire form.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use columbus_core::{ColumbusError, EncodedAttachment};

use crate::attachments::Attachment;

/// Encodes one attachment as standard base64, keeping its name and media type.
///
/// Fails instead of producing a partial payload when the buffer does not hold
/// the number of bytes its source declared.
pub fn encode(attachment: &Attachment) -> Result<EncodedAttachment, ColumbusError> {
    if !attachment.is_complete() {
        return Err(ColumbusError::Encoding {
            filename: attachment.display_name().to_string(),
            message: format!(
                "read {} bytes, expected {}",
                attachment.bytes().len(),
                attachment.declared_size()
            ),
        });
    }

    Ok(EncodedAttachment {
        filename: attachment.display_name().to_string(),
        content: STANDARD.encode(attachment.bytes()),
        content_type: attachment.media_type().to_string(),
    })
}

/// Encodes every attachment in order, stopping at the first failure.
pub fn encode_all(attachments: &[Attachment]) -> Result<Vec<EncodedAttachment>, ColumbusError> {
    attachments.iter().map(encode).collect()
}
