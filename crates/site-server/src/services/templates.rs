//! Page templates.
//!
//! Handlers render pages by logical name through the [`Renderer`] trait. The
//! [`TemplateRegistry`] is built once at startup and maps each name to a
//! template function reading its data from a JSON context.

use std::collections::HashMap;

use anyhow::anyhow;
use serde_json::Value;
use site_common::config::SiteConfig;
use site_common::url::encode_segment;

pub const DOWNLOADS_INDEX: &str = "downloads/index";
pub const DOWNLOADS_VIEW: &str = "downloads/view";

/// Renders a named page with a context object.
pub trait Renderer: Send + Sync + 'static {
    fn render(&self, name: &str, context: &Value) -> anyhow::Result<String>;
}

type TemplateFn = fn(&SiteConfig, &Value) -> String;

pub struct TemplateRegistry {
    site: SiteConfig,
    templates: HashMap<&'static str, TemplateFn>,
}

impl TemplateRegistry {
    /// Empty registry.
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            templates: HashMap::new(),
        }
    }

    /// Registry with every page the site serves.
    pub fn builtin(site: SiteConfig) -> Self {
        Self::new(site)
            .register(DOWNLOADS_INDEX, downloads_index)
            .register(DOWNLOADS_VIEW, downloads_view)
    }

    pub fn register(mut self, name: &'static str, template: TemplateFn) -> Self {
        self.templates.insert(name, template);
        self
    }
}

impl Renderer for TemplateRegistry {
    fn render(&self, name: &str, context: &Value) -> anyhow::Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| anyhow!("Unknown template '{}'", name))?;

        Ok(template(&self.site, context))
    }
}

// ─── Helpers ─────────────────────────────────────────────────

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text<'a>(context: &'a Value, pointer: &str) -> &'a str {
    context.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

/// `null` or `{}` stand in for a release that could not be looked up.
fn is_placeholder(release: &Value) -> bool {
    match release {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

fn format_date(value: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn format_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes as f64 >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB)
    } else {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    }
}

fn layout(site: &SiteConfig, context: &Value, body: &str) -> String {
    let title = text(context, "/page/title");
    let description = text(context, "/page/description");
    let canonical = format!("{}{}", site.base_url(), text(context, "/page/path"));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - {name}</title>
<meta name="description" content="{description}">
<link rel="canonical" href="{canonical}">
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        name = escape(&site.name),
        description = escape(description),
        canonical = escape(&canonical),
        body = body,
    )
}

/// Summary card linking to a release's permanent page.
fn release_card(release: &Value, base_path: &str) -> String {
    if is_placeholder(release) {
        return "<p class=\"unavailable\">No build is currently available.</p>".to_string();
    }

    let identifier = match text(release, "/version") {
        "" => text(release, "/git_hash_short"),
        version => version,
    };
    let href = format!(
        "{}/{}/{}",
        base_path.trim_end_matches('/'),
        encode_segment(text(release, "/branch")),
        encode_segment(identifier)
    );

    format!(
        "<article class=\"release\">\n<h3><a href=\"{href}\">{title}</a></h3>\n<p>Published {date}, commit <code>{hash}</code></p>\n</article>",
        href = escape(&href),
        title = escape(text(release, "/long_title")),
        date = escape(&format_date(text(release, "/published_at"))),
        hash = escape(text(release, "/git_hash_short")),
    )
}

fn asset_list(release: &Value) -> String {
    let assets = match release.get("assets").and_then(Value::as_array) {
        Some(assets) if !assets.is_empty() => assets,
        _ => return "<p>No downloads are attached to this build.</p>".to_string(),
    };

    let mut rows = String::new();
    for asset in assets {
        let size = asset.get("size").and_then(Value::as_u64).unwrap_or(0);
        rows.push_str(&format!(
            "<li><a href=\"{url}\">{name}</a>{size}</li>\n",
            url = escape(text(asset, "/url")),
            name = escape(text(asset, "/name")),
            size = if size > 0 {
                format!(" <span class=\"size\">({})</span>", format_size(size))
            } else {
                String::new()
            },
        ));
    }

    format!("<ul class=\"assets\">\n{}</ul>", rows)
}

// ─── Pages ───────────────────────────────────────────────────

fn downloads_index(site: &SiteConfig, context: &Value) -> String {
    let path = text(context, "/page/path");
    let body = format!(
        "<h1>Downloads</h1>\n<section>\n<h2>Latest release</h2>\n{release}\n</section>\n<section>\n<h2>Latest development build</h2>\n{develop}\n</section>",
        release = release_card(context.get("last_release").unwrap_or(&Value::Null), path),
        develop = release_card(context.get("last_develop").unwrap_or(&Value::Null), path),
    );
    layout(site, context, &body)
}

fn downloads_view(site: &SiteConfig, context: &Value) -> String {
    let release = context.get("release").unwrap_or(&Value::Null);
    let latest = context
        .get("latest")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let permalink = if latest {
        format!(
            "<p class=\"permalink\">Permanent link: <a href=\"{href}\">{hash}</a></p>\n",
            href = escape(&encode_segment(text(release, "/git_hash_short"))),
            hash = escape(text(release, "/git_hash_short")),
        )
    } else {
        String::new()
    };

    let body = format!(
        "<h1>{title}</h1>\n<p>Branch <code>{branch}</code>, published {date}, commit <code>{hash}</code></p>\n{permalink}{assets}",
        title = escape(text(release, "/long_title")),
        branch = escape(text(release, "/branch")),
        date = escape(&format_date(text(release, "/published_at"))),
        hash = escape(text(release, "/git_hash")),
        permalink = permalink,
        assets = asset_list(release),
    );
    layout(site, context, &body)
}
