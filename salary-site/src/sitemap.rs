//! XML sitemaps for the generated pages.
//!
//! Up to `chunk_size` URLs go into a single `sitemap.xml` url set. Beyond
//! that the URLs are split into `sitemap-1.xml`, `sitemap-2.xml`, ... and
//! `sitemap.xml` becomes a sitemap index pointing at the parts.

use crate::render::escape_html;

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A sitemap file, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapFile {
    pub name: String,
    pub contents: String,
}

/// Builds the sitemap files for `urls`.
///
/// `site_root` is the absolute URL of the output directory, used to link
/// the parts from the index. A `chunk_size` of zero is treated as one.
pub fn build_sitemaps(
    urls: &[String],
    site_root: &str,
    lastmod: &str,
    chunk_size: usize,
) -> Vec<SitemapFile> {
    let chunk_size = chunk_size.max(1);
    if urls.len() <= chunk_size {
        return vec![SitemapFile {
            name: "sitemap.xml".to_string(),
            contents: url_set(urls, lastmod),
        }];
    }

    let mut files: Vec<SitemapFile> = urls
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, chunk)| SitemapFile {
            name: format!("sitemap-{}.xml", i + 1),
            contents: url_set(chunk, lastmod),
        })
        .collect();

    let parts: Vec<String> = files
        .iter()
        .map(|file| format!("{}/{}", site_root.trim_end_matches('/'), file.name))
        .collect();
    files.push(SitemapFile {
        name: "sitemap.xml".to_string(),
        contents: sitemap_index(&parts, lastmod),
    });
    files
}

fn url_set(
    urls: &[String],
    lastmod: &str,
) -> String {
    let entries: String = urls
        .iter()
        .map(|url| {
            format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n  </url>\n",
                escape_html(url)
            )
        })
        .collect();
    format!("{XML_HEADER}<urlset xmlns=\"{SITEMAP_NS}\">\n{entries}</urlset>\n")
}

fn sitemap_index(
    parts: &[String],
    lastmod: &str,
) -> String {
    let entries: String = parts
        .iter()
        .map(|url| {
            format!(
                "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n  </sitemap>\n",
                escape_html(url)
            )
        })
        .collect();
    format!("{XML_HEADER}<sitemapindex xmlns=\"{SITEMAP_NS}\">\n{entries}</sitemapindex>\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROOT: &str = "https://example.org/salary-needed";

    fn urls(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{ROOT}/city-{i}.html")).collect()
    }

    #[test]
    fn test_single_url_set() {
        let files = build_sitemaps(&urls(2), ROOT, "2026-01-01", 2000);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "sitemap.xml");
        assert_eq!(
            files[0].contents,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">
  <url>
    <loc>https://example.org/salary-needed/city-1.html</loc>
    <lastmod>2026-01-01</lastmod>
  </url>
  <url>
    <loc>https://example.org/salary-needed/city-2.html</loc>
    <lastmod>2026-01-01</lastmod>
  </url>
</urlset>
"
        );
    }

    #[test]
    fn test_exactly_one_chunk_stays_single() {
        let files = build_sitemaps(&urls(3), ROOT, "2026-01-01", 3);
        assert_eq!(files.len(), 1);
        assert!(files[0].contents.contains("<urlset"));
    }

    #[test]
    fn test_chunked_with_index() {
        let files = build_sitemaps(&urls(5), ROOT, "2026-01-01", 2);

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["sitemap-1.xml", "sitemap-2.xml", "sitemap-3.xml", "sitemap.xml"]);

        assert_eq!(files[0].contents.matches("<url>").count(), 2);
        assert_eq!(files[2].contents.matches("<url>").count(), 1);
        assert!(files[2].contents.contains("city-5.html"));

        let index = &files[3].contents;
        assert!(index.contains("<sitemapindex"));
        assert_eq!(index.matches("<sitemap>").count(), 3);
        assert!(index.contains("<loc>https://example.org/salary-needed/sitemap-2.xml</loc>"));
    }

    #[test]
    fn test_empty_url_list() {
        let files = build_sitemaps(&[], ROOT, "2026-01-01", 10);
        assert_eq!(files.len(), 1);
        assert!(!files[0].contents.contains("<url>"));
    }

    #[test]
    fn test_locations_are_escaped() {
        let files = build_sitemaps(&["https://example.org/?a=1&b=2".to_string()], ROOT, "2026-01-01", 10);
        assert!(files[0].contents.contains("<loc>https://example.org/?a=1&amp;b=2</loc>"));
    }

    #[test]
    fn test_zero_chunk_size_treated_as_one() {
        let files = build_sitemaps(&urls(2), ROOT, "2026-01-01", 0);
        assert_eq!(files.len(), 3);
    }
}
