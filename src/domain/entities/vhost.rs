//! Virtual host document for nginx
//!
//! Rendered from the site's domains and name. The remote copy is compared
//! byte-for-byte against this rendering to decide whether to upload.

use crate::domain::value_objects::{ServerLayout, SiteName};

use super::SiteConfig;

/// Rendered nginx server block for one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualHostConfig {
    site: SiteName,
    content: String,
}

impl VirtualHostConfig {
    pub fn render(site: &SiteConfig, layout: &ServerLayout) -> Self {
        let content = format!(
            "server {{
  listen 80;
  server_name {server_names};
  root {root};
  index index.html index.htm;

  location / {{
    try_files $uri $uri/ =404;
  }}
}}
",
            server_names = site.domains.join(" "),
            root = layout.web_root(&site.name),
        );

        Self {
            site: site.name.clone(),
            content,
        }
    }

    pub fn site(&self) -> &SiteName {
        &self.site
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::site::sample_site;

    #[test]
    fn renders_server_block() {
        let vhost = VirtualHostConfig::render(&sample_site(), &ServerLayout::default());
        insta::assert_snapshot!(vhost.content().trim_end(), @r"
        server {
          listen 80;
          server_name example.com www.example.com;
          root /var/www/example;
          index index.html index.htm;

          location / {
            try_files $uri $uri/ =404;
          }
        }
        ");
    }

    #[test]
    fn ends_with_single_newline() {
        let vhost = VirtualHostConfig::render(&sample_site(), &ServerLayout::default());
        assert!(vhost.content().ends_with("}\n"));
        assert!(!vhost.content().ends_with("\n\n"));
    }

    #[test]
    fn domains_keep_their_order() {
        let mut site = sample_site();
        site.domains = vec!["b.org".into(), "a.org".into(), "c.org".into()];
        let vhost = VirtualHostConfig::render(&site, &ServerLayout::default());
        assert!(vhost.content().contains("server_name b.org a.org c.org;"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let layout = ServerLayout::default();
        let a = VirtualHostConfig::render(&sample_site(), &layout);
        let b = VirtualHostConfig::render(&sample_site(), &layout);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }
}
