use crate::config::Config;
use derek_data::v1::DerekConfig;
use log::{debug, trace};
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::StatusCode;
use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("unable to fetch the maintainers list ({location})")]
    Unreachable {
        location: String,
        #[source]
        source: BoxError,
    },
    #[error("HTTP status code {status} while fetching the maintainers list ({location})")]
    Status { location: String, status: StatusCode },
    #[error("the maintainers list is malformed ({location})")]
    Malformed {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl PolicyError {
    /// Whether the policy could not be retrieved at all, as opposed to being
    /// retrieved but not understood.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            PolicyError::Unreachable { .. } | PolicyError::Status { .. }
        )
    }
}

/// Decode the YAML content of a policy document. An empty document is an
/// empty policy.
pub fn decode(location: &str, content: &str) -> Result<DerekConfig, PolicyError> {
    if content.trim().is_empty() {
        return Ok(DerekConfig::default());
    }
    serde_yaml::from_str(content).map_err(|source| PolicyError::Malformed {
        location: location.to_string(),
        source,
    })
}

/// Fetches the policy document from the default branch of a repository.
pub struct PolicyFetcher {
    http: Client,
    config: Config,
}

impl PolicyFetcher {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(PolicyFetcher {
            http: ClientBuilder::new()
                .user_agent(crate::USER_AGENT)
                .timeout(config.timeout)
                .build()?,
            config,
        })
    }

    pub fn fetch(&self, owner: &str, repo: &str) -> Result<DerekConfig, PolicyError> {
        let url = self.config.policy_url(owner, repo);
        debug!("fetching the maintainers list from {url}");

        let unreachable = |source: reqwest::Error| PolicyError::Unreachable {
            location: url.clone(),
            source: source.into(),
        };
        let resp = self.http.get(&url).send().map_err(unreachable)?;
        trace!("http response: {} from {}", resp.status(), url);
        if resp.status() != StatusCode::OK {
            return Err(PolicyError::Status {
                location: url,
                status: resp.status(),
            });
        }
        let body = resp.text().map_err(unreachable)?;
        decode(&url, &body)
    }
}

/// Where the policy of a repository comes from.
pub enum PolicySource {
    Remote(PolicyFetcher),
    /// A single local file used for every repository.
    Local(PathBuf),
}

impl PolicySource {
    pub fn load(&self, owner: &str, repo: &str) -> Result<DerekConfig, PolicyError> {
        match self {
            PolicySource::Remote(fetcher) => fetcher.fetch(owner, repo),
            PolicySource::Local(path) => {
                let location = path.display().to_string();
                debug!("loading the maintainers list for {owner}/{repo} from {location}");
                let content = std::fs::read_to_string(path).map_err(|e| {
                    PolicyError::Unreachable {
                        location: location.clone(),
                        source: e.into(),
                    }
                })?;
                decode(&location, &content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    /// Serve a single HTTP response on a local port, returning the host to
    /// point the fetcher at and the request line that was received.
    fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, std::thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            let request = String::from_utf8_lossy(&request);
            request.lines().next().unwrap_or_default().to_string()
        });
        (host, handle)
    }

    fn fetcher(host: String) -> PolicyFetcher {
        PolicyFetcher::new(Config {
            host,
            timeout: Duration::from_secs(5),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn decode_ignores_unknown_keys() {
        let config = decode("test", "features: [comments]\nredirect: elsewhere\n").unwrap();
        insta::assert_debug_snapshot!(config, @r###"
        DerekConfig {
            features: [
                "comments",
            ],
            maintainers: [],
        }
        "###);
    }

    #[test]
    fn decode_empty_document() {
        assert_eq!(decode("test", "\n").unwrap(), DerekConfig::default());
    }

    #[test]
    fn decode_malformed() {
        let err = decode("test", "features: {{ nope").unwrap_err();
        assert!(matches!(err, PolicyError::Malformed { .. }));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn fetch_ok() {
        let (host, server) = serve_once(
            "200 OK",
            "features:\n- comments\nmaintainers:\n- alice\n",
        );
        let config = fetcher(host).fetch("alexellis", "derek").unwrap();
        assert_eq!(config.features, vec!["comments"]);
        assert_eq!(config.maintainers, vec!["alice"]);
        assert_eq!(
            server.join().unwrap(),
            "GET /alexellis/derek/raw/HEAD/.DEREK.yml HTTP/1.1"
        );
    }

    #[test]
    fn fetch_not_found() {
        let (host, _server) = serve_once("404 Not Found", "");
        let err = fetcher(host).fetch("alexellis", "derek").unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }
        ));
        assert!(err.is_unreachable());
    }

    #[test]
    fn fetch_malformed() {
        let (host, _server) = serve_once("200 OK", "maintainers: alice: bob");
        let err = fetcher(host).fetch("alexellis", "derek").unwrap_err();
        assert!(matches!(err, PolicyError::Malformed { .. }));
    }

    #[test]
    fn fetch_connection_refused() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = fetcher(format!("http://127.0.0.1:{port}"))
            .fetch("alexellis", "derek")
            .unwrap_err();
        assert!(matches!(err, PolicyError::Unreachable { .. }));
    }

    #[test]
    fn fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let host = format!("http://{}", listener.local_addr().unwrap());
        std::thread::spawn(move || {
            let _conn = listener.accept();
            std::thread::sleep(Duration::from_secs(2));
        });
        let fetcher = PolicyFetcher::new(Config {
            host,
            timeout: Duration::from_millis(200),
            ..Config::default()
        })
        .unwrap();
        let err = fetcher.fetch("alexellis", "derek").unwrap_err();
        assert!(matches!(err, PolicyError::Unreachable { .. }));
    }

    #[test]
    fn local_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = PolicySource::Local(dir.path().join("missing.yml"));
        assert!(source.load("o", "r").unwrap_err().is_unreachable());
    }
}
