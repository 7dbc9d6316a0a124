//! Inbound relay form
//!
//! The GUI posts one multipart form per upload: an optional `images` file,
//! the `remote_ip`/`remote_port` pair naming where to relay it, and any
//! number of extra text fields that travel on to the remote untouched.

use axum::extract::Multipart;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use super::error::RelayError;

pub const IMAGE_FIELD: &str = "images";
pub const REMOTE_IP_FIELD: &str = "remote_ip";
pub const REMOTE_PORT_FIELD: &str = "remote_port";

/// Uploaded file carried through to the remote
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct RelayForm {
    pub image: Option<FilePart>,
    pub remote_ip: Option<String>,
    pub remote_port: Option<String>,
    /// Text fields to forward, one per name in first-seen order.
    /// Never holds the routing fields.
    fields: Vec<(String, String)>,
}

impl RelayForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, RelayError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();

            if field.file_name().is_some() {
                if name != IMAGE_FIELD {
                    tracing::debug!("Ignoring unexpected file field: {}", name);
                    continue;
                }
                if form.image.is_some() {
                    tracing::debug!("Ignoring extra '{}' file part", IMAGE_FIELD);
                    continue;
                }
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                tracing::info!(
                    "Image received: {} ({} bytes)",
                    file_name.as_deref().unwrap_or("<unnamed>"),
                    bytes.len()
                );
                form.image = Some(FilePart { file_name, content_type, bytes });
            } else {
                let value = field.text().await?;
                form.push_field(name, value);
            }
        }

        Ok(form)
    }

    /// Record a text field. The first value of each name wins; routing
    /// fields are captured and kept out of the forwarded set.
    pub fn push_field(&mut self, name: String, value: String) {
        match name.as_str() {
            REMOTE_IP_FIELD => {
                self.remote_ip.get_or_insert(value);
            }
            REMOTE_PORT_FIELD => {
                self.remote_port.get_or_insert(value);
            }
            _ if self.fields.iter().any(|(n, _)| *n == name) => {
                tracing::debug!("Ignoring repeated form field: {}", name);
            }
            _ => {
                tracing::debug!("Form field: {} = {}", name, value);
                self.fields.push((name, value));
            }
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Build the outbound multipart body for the remote server.
    /// `None` when nothing is left to forward: a zero-part multipart body has
    /// no closing boundary and remote parsers reject it.
    pub fn into_outbound(self) -> Result<Option<Form>, RelayError> {
        if self.fields.is_empty() && self.image.is_none() {
            return Ok(None);
        }

        let mut form = Form::new();

        for (name, value) in self.fields {
            form = form.text(name, value);
        }

        if let Some(image) = self.image {
            let mut part = Part::bytes(image.bytes.to_vec());
            if let Some(file_name) = image.file_name {
                part = part.file_name(file_name);
            }
            if let Some(content_type) = image.content_type {
                part = part.mime_str(&content_type)?;
            }
            form = form.part(IMAGE_FIELD, part);
        }

        Ok(Some(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> RelayForm {
        let mut form = RelayForm::default();
        for (name, value) in fields {
            form.push_field(name.to_string(), value.to_string());
        }
        form
    }

    #[test]
    fn routing_fields_are_not_forwarded() {
        let form = form_with(&[
            ("user_id", "u1"),
            ("remote_ip", "10.0.0.5"),
            ("project_number", "42"),
            ("remote_port", "8000"),
            ("floor_number", "3"),
        ]);

        assert_eq!(form.remote_ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(form.remote_port.as_deref(), Some("8000"));
        let names: Vec<_> = form.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["user_id", "project_number", "floor_number"]);
    }

    #[test]
    fn first_routing_value_wins() {
        let form = form_with(&[
            ("remote_ip", "first"),
            ("remote_ip", "second"),
        ]);
        assert_eq!(form.remote_ip.as_deref(), Some("first"));
        assert!(form.fields().is_empty());
    }

    #[test]
    fn repeated_extra_fields_keep_first_value() {
        let form = form_with(&[("tag", "a"), ("floor_number", "1"), ("tag", "b")]);
        assert_eq!(
            form.fields(),
            [
                ("tag".to_string(), "a".to_string()),
                ("floor_number".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn outbound_form_rejects_bad_content_type() {
        let mut form = RelayForm::default();
        form.image = Some(FilePart {
            file_name: Some("plan.png".into()),
            content_type: Some("not a mime".into()),
            bytes: Bytes::from_static(b"png"),
        });
        assert!(matches!(form.into_outbound(), Err(RelayError::Request(_))));
    }

    #[test]
    fn outbound_form_builds_without_image() {
        let form = form_with(&[("user_id", "u1")]);
        assert!(matches!(form.into_outbound(), Ok(Some(_))));
    }

    #[test]
    fn only_routing_fields_means_no_outbound_body() {
        let form = form_with(&[("remote_ip", "127.0.0.1"), ("remote_port", "8000")]);
        assert!(matches!(form.into_outbound(), Ok(None)));
    }
}
