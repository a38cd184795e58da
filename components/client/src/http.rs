// Copyright 2024 syfilter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::{Debug, Formatter};

use futures::{future::BoxFuture, FutureExt};
use serde::Deserialize;
use snafu::{ensure, ResultExt};
use syfilter_common::MATRIX_CLIENT_PREFIX;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    err::{InvalidHomeserverSnafu, Result, ServerRejectedSnafu, TransportSnafu},
    filter::{Filter, FilterDefinition},
    service::FilterService,
};

#[derive(Deserialize)]
struct CreateFilterResponse {
    filter_id: String,
}

/// Uploads filters to a homeserver on behalf of one user.
#[derive(Clone)]
pub struct HttpFilterService {
    client:       reqwest::Client,
    endpoint:     Url,
    access_token: String,
}

impl Debug for HttpFilterService {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut ds = f.debug_struct("HttpFilterService");
        ds.field("endpoint", &self.endpoint.as_str());
        ds.finish()
    }
}

fn filter_endpoint(homeserver: &str, user_id: &str) -> Result<Url> {
    let mut url = Url::parse(homeserver).map_err(|e| {
        InvalidHomeserverSnafu {
            url:    homeserver,
            reason: e.to_string(),
        }
        .build()
    })?;
    ensure!(
        matches!(url.scheme(), "http" | "https"),
        InvalidHomeserverSnafu {
            url:    homeserver,
            reason: "scheme must be http or https",
        }
    );
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            InvalidHomeserverSnafu {
                url:    homeserver,
                reason: "cannot be a base url",
            }
            .build()
        })?;
        segments
            .pop_if_empty()
            .extend(MATRIX_CLIENT_PREFIX.split('/').filter(|s| !s.is_empty()))
            .extend(["user", user_id, "filter"]);
    }
    Ok(url)
}

impl HttpFilterService {
    pub fn new(homeserver: &str, user_id: &str, access_token: &str) -> Result<Self> {
        Ok(Self {
            client:       reqwest::Client::new(),
            endpoint:     filter_endpoint(homeserver, user_id)?,
            access_token: access_token.to_string(),
        })
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn upload(self, definition: FilterDefinition) -> Result<Filter> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .query(&[("access_token", self.access_token.as_str())])
            .json(&definition)
            .send()
            .await
            .context(TransportSnafu)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return ServerRejectedSnafu {
                status: status.as_u16(),
                body,
            }
            .fail();
        }

        let created: CreateFilterResponse = resp.json().await.context(TransportSnafu)?;
        debug!("server created filter {}", created.filter_id);
        Ok(Filter {
            id: created.filter_id,
            definition,
        })
    }
}

impl FilterService for HttpFilterService {
    fn create(&self, definition: FilterDefinition) -> BoxFuture<'static, Result<Filter>> {
        self.clone().upload(definition).boxed()
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;
    use crate::err::Error;

    #[test]
    fn endpoint_layout() {
        let url = filter_endpoint("https://matrix.example.org/", "@alice:example.org").unwrap();
        assert_eq!(
            url.as_str(),
            "https://matrix.example.org/_matrix/client/v2_alpha/user/@alice:example.org/filter"
        );

        let url = filter_endpoint("http://localhost:8008/base", "@bob:localhost").unwrap();
        assert_eq!(url.path(), "/base/_matrix/client/v2_alpha/user/@bob:localhost/filter");
    }

    #[test]
    fn endpoint_rejects_bad_homeserver() {
        for hs in ["not a url", "mailto:someone@example.org", "ftp://example.org"] {
            let err = filter_endpoint(hs, "@a:b").unwrap_err();
            assert!(matches!(err, Error::InvalidHomeserver { .. }), "{hs}");
        }
    }

    // Serves exactly one request with the given status and body and hands
    // back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = sock.read(&mut buf).await.unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(idx) = text.find("\r\n\r\n") {
                    let len = text[..idx]
                        .lines()
                        .find_map(|l| {
                            let l = l.to_ascii_lowercase();
                            l.strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if raw.len() >= idx + 4 + len {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let resp = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn create_filter() {
        let (hs, server) = serve_once("200 OK", r#"{"filter_id":"66696p746572"}"#).await;
        let service = HttpFilterService::new(&hs, "@alice:localhost", "secret").unwrap();
        let def = service.new_filter().include_types("m.*").build();

        let filter = service.create(def.clone()).await.unwrap();
        assert_eq!(filter.id, "66696p746572");
        assert_eq!(filter.definition, def);

        let req = server.await.unwrap();
        assert!(req.starts_with("POST /_matrix/client/v2_alpha/user/@alice:localhost/filter?access_token=secret "));
        assert!(req.ends_with(r#"{"types":["m.*"]}"#));
    }

    #[tokio::test]
    async fn server_rejects_filter() {
        let (hs, server) = serve_once(
            "403 Forbidden",
            r#"{"errcode":"M_FORBIDDEN","error":"Cannot create filters for other users"}"#,
        )
        .await;
        let service = HttpFilterService::new(&hs, "@alice:localhost", "secret").unwrap();
        let err = service
            .create(service.new_filter().include_types("m.*").build())
            .await
            .unwrap_err();
        match err {
            Error::ServerRejected { status, body, .. } => {
                assert_eq!(status, 403);
                assert!(body.contains("M_FORBIDDEN"));
            }
            e => panic!("unexpected error {e:?}"),
        }
        server.await.unwrap();
    }
}
