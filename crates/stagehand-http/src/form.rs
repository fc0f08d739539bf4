//! Form body reading.
//!
//! Handlers under test read form values the way they would on a live server:
//! `application/x-www-form-urlencoded` bodies are decoded with
//! `serde_urlencoded`, and `multipart/form-data` bodies are split on the
//! boundary from the Content-Type header.

use crate::error::FormError;
use bytes::Bytes;
use http::{header, HeaderMap};
use indexmap::IndexMap;

/// A file part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Form field name.
    pub field_name: String,
    /// Filename as sent by the client.
    pub file_name: String,
    /// Content-Type of the part, if one was sent.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

/// Parsed form values and files, in body order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: IndexMap<String, Vec<String>>,
    files: IndexMap<String, Vec<UploadedFile>>,
}

impl FormData {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value for a key.
    pub fn push_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Adds an uploaded file.
    pub fn push_file(&mut self, file: UploadedFile) {
        self.files
            .entry(file.field_name.clone())
            .or_default()
            .push(file);
    }

    /// Returns the first value for a key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for a key.
    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.values.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns the first file uploaded under a field name.
    #[must_use]
    pub fn file(&self, field_name: &str) -> Option<&UploadedFile> {
        self.files.get(field_name).and_then(|files| files.first())
    }

    /// Returns an iterator over all value keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of distinct value keys plus file field names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() + self.files.len()
    }

    /// Returns true if the form has no values and no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.files.is_empty()
    }
}

/// Parses a request body as form data according to its Content-Type.
///
/// # Example
///
/// ```rust
/// use stagehand_http::parse_form;
/// use http::{header, HeaderMap, HeaderValue};
/// use bytes::Bytes;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::CONTENT_TYPE,
///     HeaderValue::from_static("application/x-www-form-urlencoded"),
/// );
///
/// let form = parse_form(&headers, &Bytes::from_static(b"name=Jim&age=20")).unwrap();
/// assert_eq!(form.value("name"), Some("Jim"));
/// assert_eq!(form.value("age"), Some("20"));
/// ```
pub fn parse_form(headers: &HeaderMap, body: &Bytes) -> Result<FormData, FormError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .ok_or(FormError::MissingContentType)?
        .to_str()
        .map_err(|_| FormError::UnsupportedContentType("<non-ascii>".to_string()))?;

    let parsed: mime::Mime = content_type
        .parse()
        .map_err(|_| FormError::UnsupportedContentType(content_type.to_string()))?;

    match parsed.essence_str() {
        "application/x-www-form-urlencoded" => {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
            let mut form = FormData::new();
            for (key, value) in pairs {
                form.push_value(key, value);
            }
            Ok(form)
        }
        "multipart/form-data" => {
            let boundary = parsed
                .get_param(mime::BOUNDARY)
                .ok_or(FormError::MissingBoundary)?;
            parse_multipart(body, boundary.as_str())
        }
        _ => Err(FormError::UnsupportedContentType(content_type.to_string())),
    }
}

fn parse_multipart(body: &Bytes, boundary: &str) -> Result<FormData, FormError> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();
    let part_end = format!("\r\n--{boundary}");
    let part_end = part_end.as_bytes();

    let mut form = FormData::new();
    let mut pos = find(body, delimiter, 0)
        .ok_or_else(|| FormError::Malformed("missing opening boundary".to_string()))?;

    loop {
        pos += delimiter.len();
        if body.get(pos..pos + 2) == Some(b"--".as_slice()) {
            return Ok(form);
        }
        if body.get(pos..pos + 2) != Some(b"\r\n".as_slice()) {
            return Err(FormError::Malformed("expected CRLF after boundary".to_string()));
        }
        pos += 2;

        let headers_end = find(body, b"\r\n\r\n", pos)
            .ok_or_else(|| FormError::Malformed("unterminated part headers".to_string()))?;
        let head = std::str::from_utf8(&body[pos..headers_end])
            .map_err(|_| FormError::Malformed("part headers are not UTF-8".to_string()))?;
        let data_start = headers_end + 4;
        let data_end = find(body, part_end, data_start)
            .ok_or_else(|| FormError::Malformed("missing closing boundary".to_string()))?;

        push_part(&mut form, head, body.slice(data_start..data_end))?;
        pos = data_end + 2;
    }
}

fn push_part(form: &mut FormData, head: &str, data: Bytes) -> Result<(), FormError> {
    let mut disposition = None;
    let mut content_type = None;
    for line in head.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.eq_ignore_ascii_case("content-disposition") {
            disposition = Some(value.trim());
        } else if name.eq_ignore_ascii_case("content-type") {
            content_type = Some(value.trim().to_string());
        }
    }

    let disposition = disposition
        .ok_or_else(|| FormError::Malformed("part without Content-Disposition".to_string()))?;
    let params = disposition_params(disposition);
    let param = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    let field_name = param("name")
        .ok_or_else(|| FormError::Malformed("part without a name".to_string()))?;

    match param("filename") {
        Some(file_name) => form.push_file(UploadedFile {
            field_name,
            file_name,
            content_type,
            data,
        }),
        None => {
            let value = String::from_utf8(data.to_vec())
                .map_err(|_| FormError::Malformed(format!("field '{field_name}' is not UTF-8")))?;
            form.push_value(field_name, value);
        }
    }
    Ok(())
}

/// Splits the parameters of a Content-Disposition value, unescaping quoted strings.
fn disposition_params(value: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let Some(start) = value.find(';') else {
        return params;
    };
    let mut rest = &value[start + 1..];

    loop {
        rest = rest.trim_start();
        let Some(eq) = rest.find('=') else {
            break;
        };
        let key = rest[..eq].trim().to_ascii_lowercase();
        rest = &rest[eq + 1..];

        let (param, remaining) = if let Some(quoted) = rest.strip_prefix('"') {
            let mut out = String::new();
            let mut end = quoted.len();
            let mut chars = quoted.char_indices();
            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            out.push(escaped);
                        }
                    }
                    '"' => {
                        end = i + 1;
                        break;
                    }
                    _ => out.push(c),
                }
            }
            (out, &quoted[end..])
        } else {
            let end = rest.find(';').unwrap_or(rest.len());
            (rest[..end].trim().to_string(), &rest[end..])
        };
        params.push((key, param));

        match remaining.find(';') {
            Some(next) => rest = &remaining[next + 1..],
            None => break,
        }
    }
    params
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    const MULTIPART: &str = "--XyZ\r\n\
        Content-Disposition: form-data; name=\"name\"\r\n\
        \r\n\
        Jim\r\n\
        --XyZ\r\n\
        Content-Disposition: form-data; name=\"tag\"\r\n\
        \r\n\
        a\r\n\
        --XyZ\r\n\
        Content-Disposition: form-data; name=\"tag\"\r\n\
        \r\n\
        b\r\n\
        --XyZ\r\n\
        Content-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\n\
        Content-Type: image/png\r\n\
        \r\n\
        PNG\r\nDATA\r\n\
        --XyZ--\r\n";

    #[test]
    fn test_urlencoded() {
        let form = parse_form(
            &headers("application/x-www-form-urlencoded"),
            &Bytes::from_static(b"name=hello+world&tag=a&tag=b"),
        )
        .unwrap();

        assert_eq!(form.value("name"), Some("hello world"));
        assert_eq!(form.values("tag"), ["a", "b"]);
    }

    #[test]
    fn test_multipart() {
        let form = parse_form(
            &headers("multipart/form-data; boundary=XyZ"),
            &Bytes::from_static(MULTIPART.as_bytes()),
        )
        .unwrap();

        assert_eq!(form.value("name"), Some("Jim"));
        assert_eq!(form.values("tag"), ["a", "b"]);

        let file = form.file("avatar").unwrap();
        assert_eq!(file.file_name, "me.png");
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
        assert_eq!(file.data.as_ref(), b"PNG\r\nDATA");
        assert_eq!(form.len(), 3);
    }

    #[test]
    fn test_multipart_without_space_before_boundary() {
        let form = parse_form(
            &headers("multipart/form-data;boundary=XyZ"),
            &Bytes::from_static(MULTIPART.as_bytes()),
        )
        .unwrap();
        assert_eq!(form.value("name"), Some("Jim"));
    }

    #[test]
    fn test_empty_multipart() {
        let form = parse_form(
            &headers("multipart/form-data; boundary=XyZ"),
            &Bytes::from_static(b"--XyZ--\r\n"),
        )
        .unwrap();
        assert!(form.is_empty());
    }

    #[test]
    fn test_missing_content_type() {
        let result = parse_form(&HeaderMap::new(), &Bytes::new());
        assert!(matches!(result, Err(FormError::MissingContentType)));
    }

    #[test]
    fn test_unsupported_content_type() {
        let result = parse_form(&headers("application/json"), &Bytes::from_static(b"{}"));
        assert!(matches!(result, Err(FormError::UnsupportedContentType(_))));
    }

    #[test]
    fn test_missing_boundary() {
        let result = parse_form(&headers("multipart/form-data"), &Bytes::new());
        assert!(matches!(result, Err(FormError::MissingBoundary)));
    }

    #[test]
    fn test_truncated_multipart() {
        let result = parse_form(
            &headers("multipart/form-data; boundary=XyZ"),
            &Bytes::from_static(b"--XyZ\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nvalue"),
        );
        assert!(matches!(result, Err(FormError::Malformed(_))));
    }

    #[test]
    fn test_disposition_params_escapes() {
        let params = disposition_params(r#"form-data; name="say \"hi\""; filename="a;b.txt""#);
        assert_eq!(
            params,
            vec![
                ("name".to_string(), "say \"hi\"".to_string()),
                ("filename".to_string(), "a;b.txt".to_string()),
            ]
        );
    }
}
