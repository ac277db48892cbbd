//! Request body → `RawInput`.
//!
//! The encoding is picked from the `Content-Type` header: multipart bodies
//! are streamed part by part so an oversized part is refused without being
//! buffered in full, url-encoded bodies go through axum's `Form`.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use bytes::BytesMut;
use forms_core::{DecodeError, FileDescriptor, RawInput};

const FALLBACK_MIME: &str = "application/octet-stream";

pub async fn decode_body(request: Request, max_part_bytes: usize) -> Result<RawInput, DecodeError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        decode_multipart(request, max_part_bytes).await
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        decode_urlencoded(request).await
    } else {
        Err(DecodeError::UnsupportedContentType(content_type))
    }
}

async fn decode_urlencoded(request: Request) -> Result<RawInput, DecodeError> {
    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
        .await
        .map_err(|e| DecodeError::Malformed(e.body_text()))?;
    let mut input = RawInput::new();
    for (name, value) in pairs {
        input.insert_text(name, value);
    }
    Ok(input)
}

async fn decode_multipart(request: Request, max_part_bytes: usize) -> Result<RawInput, DecodeError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| DecodeError::Malformed(e.body_text()))?;

    let mut input = RawInput::new();
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| DecodeError::Malformed(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        let mime_type = field.content_type().unwrap_or(FALLBACK_MIME).to_string();

        let mut buf = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| DecodeError::Malformed(e.body_text()))?
        {
            if buf.len() + chunk.len() > max_part_bytes {
                return Err(DecodeError::PartTooLarge {
                    field: name,
                    limit: max_part_bytes,
                });
            }
            buf.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) => {
                input.insert_file(name, FileDescriptor::new(file_name, mime_type, buf.freeze()));
            }
            None => {
                let text = String::from_utf8(buf.to_vec())
                    .map_err(|_| DecodeError::Malformed(format!("field `{name}` is not UTF-8")))?;
                input.insert_text(name, text);
            }
        }
    }
    Ok(input)
}
