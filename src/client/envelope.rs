//! The response envelope every Bot API call returns, per §3 and §6.

use serde::Deserialize;

use crate::error::{ApiError, Error, ResponseParameters};

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    ok: bool,
    description: Option<String>,
    result: Option<serde_json::Value>,
    error_code: Option<i32>,
    parameters: Option<ResponseParameters>,
}

/// The decoded envelope, not yet unmarshaled into a typed result.
#[derive(Debug)]
pub struct ResponseEnvelope {
    pub ok: bool,
    pub result: Option<serde_json::Value>,
    pub description: Option<String>,
    pub error_code: Option<i32>,
    pub parameters: Option<ResponseParameters>,
    pub http_status: u16,
}

impl ResponseEnvelope {
    pub fn parse(body: &str, http_status: u16) -> crate::Result<Self> {
        let raw: RawEnvelope = serde_json::from_str(body)
            .map_err(|e| Error::invalid_json(e, body.to_owned()))?;
        Ok(Self {
            ok: raw.ok,
            result: raw.result,
            description: raw.description,
            error_code: raw.error_code,
            parameters: raw.parameters,
            http_status,
        })
    }

    /// Converts this envelope into either the decoded typed result or an
    /// [`Error::Api`], per the "Decoding" rule of §4.2 and the open
    /// question on a missing `error_code` in §9.
    pub fn into_result<T: for<'de> Deserialize<'de>>(self) -> crate::Result<T> {
        if !self.ok {
            let message = self.description.unwrap_or_else(|| "unknown API error".to_owned());
            let mut err = ApiError::new(self.error_code.unwrap_or(0), message);
            if let Some(parameters) = self.parameters {
                err = err.with_parameters(parameters);
            }
            return Err(Error::Api(err));
        }

        match self.result {
            // A bare `true` result is a no-result call (§3); try `null`
            // first so `T = ()` decodes cleanly, falling back to the raw
            // `true` for callers who actually asked for a `bool`.
            Some(serde_json::Value::Bool(true)) => {
                serde_json::from_value(serde_json::Value::Null)
                    .or_else(|_| serde_json::from_value(serde_json::Value::Bool(true)))
                    .map_err(|e| Error::invalid_json(e, "true".to_owned()))
            }
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| Error::invalid_json(e, value.to_string())),
            None => serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| Error::invalid_json(e, "null".to_owned())),
        }
    }
}
