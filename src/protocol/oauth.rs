use base64::prelude::*;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, PercentEncode, NON_ALPHANUMERIC};
use rand::{thread_rng, RngCore};
use serde::Deserialize;
use sha1::Sha1;
use sha2::Sha256;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

use crate::error::{ForwarderError, Result};

const NONCE_BYTES: usize = 16;
const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
const OAUTH_NONCE: &str = "oauth_nonce";
const OAUTH_SIGNATURE: &str = "oauth_signature";
const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
const OAUTH_VERSION: &str = "oauth_version";
const HMAC_LENGTH_ERROR: &str = "HMAC has no key length restrictions";

// RFC 3986 非保留字符之外的全部编码
const EXCLUDE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn percent_encode<T: ?Sized + AsRef<[u8]>>(data: &T) -> PercentEncode<'_> {
    percent_encoding::percent_encode(data.as_ref(), EXCLUDE)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
pub enum SignatureMethod {
    #[default]
    #[serde(rename = "HMAC-SHA1")]
    HmacSha1,
    #[serde(rename = "HMAC-SHA256")]
    HmacSha256,
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HmacSha1 => write!(f, "HMAC-SHA1"),
            Self::HmacSha256 => write!(f, "HMAC-SHA256"),
        }
    }
}

impl SignatureMethod {
    fn sign(self, base_string: &str, key: &str) -> Result<String> {
        let signature = match self {
            Self::HmacSha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
                    .map_err(|_| ForwarderError::Signing(HMAC_LENGTH_ERROR.to_string()))?;
                mac.update(base_string.as_bytes());
                BASE64_STANDARD.encode(mac.finalize().into_bytes())
            }
            Self::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())
                    .map_err(|_| ForwarderError::Signing(HMAC_LENGTH_ERROR.to_string()))?;
                mac.update(base_string.as_bytes());
                BASE64_STANDARD.encode(mac.finalize().into_bytes())
            }
        };
        Ok(signature)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(pub String);

impl Nonce {
    pub fn generate() -> Nonce {
        let mut rand = [0_u8; NONCE_BYTES];
        thread_rng().fill_bytes(&mut rand);
        Nonce(BASE64_URL_SAFE_NO_PAD.encode(rand))
    }
}

fn timestamp() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ForwarderError::Signing(format!("Bad system time: {}", e)))?
        .as_secs())
}

/// 单腿 OAuth 1.0 签名会话，构造后只读，可跨调用复用
#[derive(Clone)]
pub struct OAuth1Session {
    consumer_key: String,
    client_secret: String,
    signature_method: SignatureMethod,
}

impl fmt::Debug for OAuth1Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Session")
            .field("consumer_key", &self.consumer_key)
            .field("signature_method", &self.signature_method)
            .finish_non_exhaustive()
    }
}

impl OAuth1Session {
    pub fn new(
        consumer_key: impl Into<String>,
        client_secret: impl Into<String>,
        signature_method: SignatureMethod,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            client_secret: client_secret.into(),
            signature_method,
        }
    }

    /// 为一次请求生成 Authorization 头，表单字段参与签名
    pub fn authorization(&self, method: &str, url: &Url, body: &[(&str, String)]) -> Result<String> {
        self.authorization_with(method, url, body, &Nonce::generate(), timestamp()?)
    }

    fn authorization_with(
        &self,
        method: &str,
        url: &Url,
        body: &[(&str, String)],
        nonce: &Nonce,
        timestamp: u64,
    ) -> Result<String> {
        let mut oauth_params = vec![
            (OAUTH_CONSUMER_KEY.to_string(), self.consumer_key.clone()),
            (OAUTH_NONCE.to_string(), nonce.0.clone()),
            (OAUTH_SIGNATURE_METHOD.to_string(), self.signature_method.to_string()),
            (OAUTH_TIMESTAMP.to_string(), timestamp.to_string()),
            (OAUTH_VERSION.to_string(), "1.0".to_string()),
        ];

        let base_string = signature_base_string(method, url, &oauth_params, body);
        let signature = self
            .signature_method
            .sign(&base_string, &self.signing_key())?;
        oauth_params.push((OAUTH_SIGNATURE.to_string(), signature));

        Ok(format!("OAuth {}", encode_auth_header(&oauth_params)))
    }

    // 无 token secret，因此以 '&' 结尾
    fn signing_key(&self) -> String {
        format!("{}&", percent_encode(&self.client_secret))
    }
}

fn signature_base_string(
    method: &str,
    url: &Url,
    oauth_params: &[(String, String)],
    body: &[(&str, String)],
) -> String {
    let mut normalized_url = url.clone();
    normalized_url.set_query(None);
    normalized_url.set_fragment(None);

    let mut params: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .chain(body.iter().map(|(k, v)| (k.to_string(), v.clone())))
        .chain(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
        .map(|(k, v)| (percent_encode(&k).to_string(), percent_encode(&v).to_string()))
        .collect();
    params.sort();

    let encoded_params = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(normalized_url.as_str()),
        percent_encode(&encoded_params)
    )
}

fn encode_auth_header(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!(r#"{}="{}""#, percent_encode(k), percent_encode(v)))
        .collect::<Vec<String>>()
        .join(", ")
}
