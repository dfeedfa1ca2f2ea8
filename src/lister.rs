// ABOUTME: Read-only display of the config file, authorized_keys or a service's remote keys
// ABOUTME: Content is copied to the output sink byte-for-byte

use crate::error::{Error, Result};
use crate::fetch::KeyFetcher;
use crate::ssh::{AuthorizedKeysStore, ConfigStore};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListTarget {
    Config,
    AuthorizedKeys,
    Remote { service: String, username: String },
}

impl ListTarget {
    /// Accepts `config`, `keys`, or `<service> <username>`. The older
    /// `github-keys` and `gitlab-keys` spellings are also understood.
    pub fn parse(target: &str, username: Option<&str>) -> Result<Self> {
        match (target, username) {
            ("config", None) => Ok(ListTarget::Config),
            ("keys", None) => Ok(ListTarget::AuthorizedKeys),
            ("config" | "keys", Some(_)) => Err(Error::InvalidArgumentCombination(format!(
                "'{target}' does not take a username"
            ))),
            (service, Some(username)) => Ok(ListTarget::Remote {
                service: match service {
                    "github-keys" => "github",
                    "gitlab-keys" => "gitlab",
                    other => other,
                }
                .to_string(),
                username: username.to_string(),
            }),
            (other, None) => Err(Error::InvalidArgumentCombination(format!(
                "invalid argument '{other}': use 'config', 'keys' or '<service> <username>'"
            ))),
        }
    }
}

pub struct Lister<'a> {
    config: &'a ConfigStore,
    authorized_keys: &'a AuthorizedKeysStore,
    fetcher: &'a KeyFetcher,
}

impl<'a> Lister<'a> {
    pub fn new(
        config: &'a ConfigStore,
        authorized_keys: &'a AuthorizedKeysStore,
        fetcher: &'a KeyFetcher,
    ) -> Self {
        Self {
            config,
            authorized_keys,
            fetcher,
        }
    }

    pub fn contents(&self, target: &ListTarget) -> Result<Vec<u8>> {
        match target {
            ListTarget::Config => self.config.read_bytes(),
            ListTarget::AuthorizedKeys => self.authorized_keys.read(),
            ListTarget::Remote { service, username } => self.fetcher.fetch(service, username),
        }
    }

    pub fn list(&self, target: &ListTarget, out: &mut dyn Write) -> Result<()> {
        let contents = self.contents(target)?;
        out.write_all(&contents)
            .and_then(|_| out.flush())
            .map_err(|e| Error::io("write", "<output>", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::test_server::{OneShotServer, client};
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = "Host test1\n    HostName 192.168.1.1\n    User user1\n\nHost test2\r\n    HostName 192.168.1.2\n";
    const KEYS: &str = "ssh-rsa key1 user1@host1\nssh-rsa key2 user2@host2\n";

    struct Fixture {
        _temp_dir: TempDir,
        config: ConfigStore,
        keys: AuthorizedKeysStore,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config");
        let keys_path = temp_dir.path().join("authorized_keys");
        fs::write(&config_path, CONFIG).unwrap();
        fs::write(&keys_path, KEYS).unwrap();
        Fixture {
            config: ConfigStore::new(config_path),
            keys: AuthorizedKeysStore::new(keys_path),
            _temp_dir: temp_dir,
        }
    }

    #[test]
    fn test_parse_list_target() {
        assert_eq!(ListTarget::parse("config", None).unwrap(), ListTarget::Config);
        assert_eq!(ListTarget::parse("keys", None).unwrap(), ListTarget::AuthorizedKeys);
        assert_eq!(
            ListTarget::parse("github-keys", Some("octocat")).unwrap(),
            ListTarget::Remote {
                service: "github".to_string(),
                username: "octocat".to_string()
            }
        );
        assert_eq!(
            ListTarget::parse("deploy-keys", Some("ci")).unwrap(),
            ListTarget::Remote {
                service: "deploy-keys".to_string(),
                username: "ci".to_string()
            }
        );
        assert!(matches!(
            ListTarget::parse("invalid", None),
            Err(Error::InvalidArgumentCombination(_))
        ));
        assert!(matches!(
            ListTarget::parse("config", Some("alice")),
            Err(Error::InvalidArgumentCombination(_))
        ));
    }

    #[test]
    fn test_list_local_files_verbatim_and_repeatably() {
        let fx = fixture();
        let fetcher = KeyFetcher::with_client(BTreeMap::new(), client());
        let lister = Lister::new(&fx.config, &fx.keys, &fetcher);

        let mut first = Vec::new();
        lister.list(&ListTarget::Config, &mut first).unwrap();
        let mut second = Vec::new();
        lister.list(&ListTarget::Config, &mut second).unwrap();
        assert_eq!(first, CONFIG.as_bytes());
        assert_eq!(first, second);

        let mut keys = Vec::new();
        lister.list(&ListTarget::AuthorizedKeys, &mut keys).unwrap();
        assert_eq!(keys, KEYS.as_bytes());

        assert_eq!(fs::read_to_string(fx.config.path()).unwrap(), CONFIG);
        assert_eq!(fs::read_to_string(fx.keys.path()).unwrap(), KEYS);
    }

    #[test]
    fn test_list_non_utf8_file_byte_for_byte() {
        let fx = fixture();
        let raw: &[u8] = b"ssh-rsa AAAA caf\xe9@host\n";
        fs::write(fx.keys.path(), raw).unwrap();
        fs::write(fx.config.path(), b"Host \xff\n").unwrap();
        let fetcher = KeyFetcher::with_client(BTreeMap::new(), client());
        let lister = Lister::new(&fx.config, &fx.keys, &fetcher);

        let mut keys = Vec::new();
        lister.list(&ListTarget::AuthorizedKeys, &mut keys).unwrap();
        assert_eq!(keys, raw);

        let mut config = Vec::new();
        lister.list(&ListTarget::Config, &mut config).unwrap();
        assert_eq!(config, b"Host \xff\n");
    }

    #[test]
    fn test_list_missing_file_is_reported_not_created() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigStore::new(temp_dir.path().join("config"));
        let keys = AuthorizedKeysStore::new(temp_dir.path().join("authorized_keys"));
        let fetcher = KeyFetcher::with_client(BTreeMap::new(), client());
        let lister = Lister::new(&config, &keys, &fetcher);

        let mut out = Vec::new();
        assert!(lister.list(&ListTarget::Config, &mut out).unwrap_err().is_not_found());
        assert!(lister.list(&ListTarget::AuthorizedKeys, &mut out).unwrap_err().is_not_found());
        assert!(out.is_empty());
        assert!(!keys.path().exists());
    }

    #[test]
    fn test_list_remote_keys() {
        let fx = fixture();
        let server = OneShotServer::start("200 OK", "ssh-rsa mock-key user@github");
        let services = BTreeMap::from([("github".to_string(), server.template())]);
        let fetcher = KeyFetcher::with_client(services, client());
        let lister = Lister::new(&fx.config, &fx.keys, &fetcher);

        let mut out = Vec::new();
        let target = ListTarget::parse("github", Some("testuser")).unwrap();
        lister.list(&target, &mut out).unwrap();

        assert_eq!(out, b"ssh-rsa mock-key user@github");
        assert_eq!(server.request_line(), "GET /testuser.keys HTTP/1.1");
    }

    #[test]
    fn test_list_unknown_service() {
        let fx = fixture();
        let fetcher = KeyFetcher::with_client(BTreeMap::new(), client());
        let lister = Lister::new(&fx.config, &fx.keys, &fetcher);

        let target = ListTarget::parse("invalid", Some("testuser")).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            lister.list(&target, &mut out),
            Err(Error::InvalidService { .. })
        ));
    }
}
