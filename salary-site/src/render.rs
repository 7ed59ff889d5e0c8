//! HTML rendering of city, neighborhood and index pages.
//!
//! Pages are plain strings built from the computed [`SalaryTiers`]; the
//! same inputs always render the same bytes. Every name taken from the
//! dataset is HTML-escaped, and the schema.org JSON-LD blocks are built
//! with `serde_json` so quoting is never done by hand.

use rust_decimal::Decimal;
use salary_core::SalaryTiers;
use serde_json::{Value, json};

use crate::config::SiteConfig;
use crate::country::country_name;
use crate::currency::format_currency;

const SITE_NAME: &str = "salary:converter";

/// Most sibling links shown on a neighborhood page.
const MAX_RELATED: usize = 6;

/// Tiers computed for one neighborhood of a city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborhoodTiers {
    pub name: String,
    pub slug: String,
    pub tiers: SalaryTiers,
}

/// Everything needed to render a city and its neighborhoods.
#[derive(Debug, Clone, Copy)]
pub struct CityView<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    /// ISO country code.
    pub country: &'a str,
    pub tiers: &'a SalaryTiers,
    /// In display order (most expensive first).
    pub neighborhoods: &'a [NeighborhoodTiers],
}

/// One line of the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub slug: String,
    pub currency: String,
    pub comfortable: Decimal,
}

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// JSON for a `<script>` block. Markup characters are written as unicode
/// escapes so a name can never close the block.
fn json_ld(value: &Value) -> String {
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

struct Crumb {
    name: String,
    path: String,
}

struct Faq {
    question: String,
    answer: String,
}

struct Page {
    title: String,
    description: String,
    canonical: String,
    og_type: &'static str,
    crumbs: Vec<Crumb>,
    current: String,
    body: String,
    schemas: Vec<Value>,
}

pub struct Renderer<'c> {
    config: &'c SiteConfig,
}

impl<'c> Renderer<'c> {
    pub fn new(config: &'c SiteConfig) -> Self {
        Self { config }
    }

    // ─── links ───────────────────────────────────────────────────────────────

    pub fn index_path(&self) -> String {
        format!("{}/", self.config.prefix())
    }

    pub fn city_path(
        &self,
        city_slug: &str,
    ) -> String {
        format!("{}/{city_slug}.html", self.config.prefix())
    }

    pub fn neighborhood_path(
        &self,
        city_slug: &str,
        neighborhood_slug: &str,
    ) -> String {
        format!("{}/{city_slug}/{neighborhood_slug}.html", self.config.prefix())
    }

    /// Turns a root-relative path into an absolute URL.
    pub fn absolute(
        &self,
        path: &str,
    ) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    // ─── pages ───────────────────────────────────────────────────────────────

    pub fn city_page(
        &self,
        city: &CityView<'_>,
    ) -> String {
        let tiers = city.tiers;
        let year = self.config.year;
        let get_by = format_currency(tiers.gross_get_by, &tiers.currency);
        let comfortable = format_currency(tiers.gross_comfortable, &tiers.currency);

        let mut body = self.tier_sections(city.name, city, tiers);
        if !city.neighborhoods.is_empty() {
            body.push_str(&self.neighborhood_table(city));
        }
        let faqs = faqs(city.name, tiers, year);
        body.push_str(&faq_section(&faqs));
        body.push_str(&self.converter_cta(city.name));

        let canonical = self.absolute(&self.city_path(city.slug));
        let crumbs = self.base_crumbs();
        let schemas = vec![
            faq_schema(&faqs),
            self.breadcrumb_schema(&crumbs, city.name, &canonical),
        ];

        self.layout(&Page {
            title: format!("What Salary Do You Need in {}? ({year})", city.name),
            description: format!(
                "Find out the minimum salary to live in {} in {year}. From {get_by} to get by, to {comfortable} to live comfortably. After-tax breakdown included.",
                city.name
            ),
            canonical,
            og_type: "article",
            crumbs,
            current: city.name.to_string(),
            body,
            schemas,
        })
    }

    pub fn neighborhood_page(
        &self,
        city: &CityView<'_>,
        neighborhood: &NeighborhoodTiers,
    ) -> String {
        let tiers = &neighborhood.tiers;
        let year = self.config.year;
        let display = format!("{}, {}", neighborhood.name, city.name);
        let get_by = format_currency(tiers.gross_get_by, &tiers.currency);
        let comfortable = format_currency(tiers.gross_comfortable, &tiers.currency);

        let mut body = self.tier_sections(&display, city, tiers);
        let faqs = faqs(&display, tiers, year);
        body.push_str(&faq_section(&faqs));
        body.push_str(&self.related_links(city, neighborhood));
        body.push_str(&self.converter_cta(city.name));

        let canonical = self.absolute(&self.neighborhood_path(city.slug, &neighborhood.slug));
        let mut crumbs = self.base_crumbs();
        crumbs.push(Crumb {
            name: city.name.to_string(),
            path: self.city_path(city.slug),
        });
        let schemas = vec![
            faq_schema(&faqs),
            self.breadcrumb_schema(&crumbs, &neighborhood.name, &canonical),
        ];

        self.layout(&Page {
            title: format!("What Salary Do You Need in {display}? ({year})"),
            description: format!(
                "Find out the minimum salary to live in {display} in {year}. From {get_by} to get by, to {comfortable} to live comfortably."
            ),
            canonical,
            og_type: "article",
            crumbs,
            current: neighborhood.name.clone(),
            body,
            schemas,
        })
    }

    /// Renders the index; `entries` are listed in the order given.
    pub fn index_page(
        &self,
        entries: &[IndexEntry],
    ) -> String {
        let year = self.config.year;
        let count = entries.len();
        let canonical = self.absolute(&self.index_path());

        let links: Vec<String> = entries
            .iter()
            .map(|entry| {
                format!(
                    "            <a href=\"{}\" class=\"city-link\"><span class=\"city-name\">{}</span> <span class=\"city-salary\">{}</span></a>\n",
                    self.city_path(&entry.slug),
                    escape_html(&entry.name),
                    format_currency(entry.comfortable, &entry.currency)
                )
            })
            .collect();

        let body = format!(
            "        <h1>What Salary Do You Need? ({year})</h1>
        <p class=\"subtitle\">The salary you need to live comfortably in {count} cities worldwide, with neighborhood-level breakdowns.</p>
        <div class=\"city-grid\">
{}        </div>
",
            links.concat()
        );

        let collection = json!({
            "@context": "https://schema.org",
            "@type": "CollectionPage",
            "name": format!("Salary Needed by City {year}"),
            "description": format!("Find out the salary you need in {count} cities worldwide"),
            "url": canonical,
        });

        self.layout(&Page {
            title: format!("What Salary Do You Need? {year} Compare {count} Cities"),
            description: format!(
                "Find out the minimum salary to live comfortably in {count} cities worldwide. Updated for {year}."
            ),
            canonical,
            og_type: "website",
            crumbs: vec![Crumb {
                name: "Home".to_string(),
                path: "/".to_string(),
            }],
            current: "Salary Needed".to_string(),
            body,
            schemas: vec![collection],
        })
    }

    // ─── sections ────────────────────────────────────────────────────────────

    fn tier_sections(
        &self,
        display: &str,
        city: &CityView<'_>,
        tiers: &SalaryTiers,
    ) -> String {
        let year = self.config.year;
        let currency = tiers.currency.as_str();
        let display = escape_html(display);
        let country = escape_html(country_name(city.country));
        let local_note = if tiers.has_local_deductions {
            format!(" (including local taxes for {})", escape_html(city.name))
        } else {
            String::new()
        };

        format!(
            "        <h1>What Salary Do You Need to Live in {display}?</h1>
        <p class=\"subtitle\">Based on {year} cost of living data, here is how much you need to earn (before tax) in {display}, {country}, from bare minimum to living well.</p>

        <div class=\"salary-cards\">
            <div class=\"salary-card\">
                <div class=\"salary-card-label\">Get By</div>
                <div class=\"salary-card-amount\">{get_by}</div>
                <div class=\"salary-card-note\">Covers rent and essentials. No savings, tight budget.</div>
            </div>
            <div class=\"salary-card highlight\">
                <div class=\"salary-card-label\">Comfortable</div>
                <div class=\"salary-card-amount\">{comfortable}</div>
                <div class=\"salary-card-note\">50/30/20 rule. Savings, dining out, some travel.</div>
            </div>
            <div class=\"salary-card\">
                <div class=\"salary-card-label\">Live Well</div>
                <div class=\"salary-card-amount\">{live_well}</div>
                <div class=\"salary-card-note\">Premium lifestyle with strong savings and flexibility.</div>
            </div>
        </div>

        <section class=\"content-card\">
            <h2>Monthly Cost Breakdown</h2>
            <div class=\"stat-row\"><span class=\"stat-label\">Rent (1BR)</span><span class=\"stat-value\">{rent}/mo</span></div>
            <div class=\"stat-row\"><span class=\"stat-label\">Groceries + Utilities + Transport + Healthcare</span><span class=\"stat-value\">{essentials}/mo</span></div>
            <div class=\"stat-row\"><span class=\"stat-label\">Total essentials</span><span class=\"stat-value\">{total}/mo</span></div>
            <div class=\"stat-row\"><span class=\"stat-label\">Effective tax + deductions rate</span><span class=\"stat-value\">{rate:.1}%</span></div>
        </section>

        <section class=\"content-card\">
            <h2>How We Calculate This</h2>
            <p>We start with actual monthly costs in {display}: rent for a 1-bedroom apartment, groceries, utilities, transport, and healthcare. For the <strong>comfortable</strong> tier we apply the 50/30/20 rule: essentials should be 50% of take-home pay, leaving 30% for wants and 20% for savings.</p>
            <p>We then reverse-calculate the gross (pre-tax) salary you would need, using {country}&#39;s progressive tax brackets and mandatory deductions{local_note}. All figures are in {currency} for {year}.</p>
        </section>
",
            get_by = format_currency(tiers.gross_get_by, currency),
            comfortable = format_currency(tiers.gross_comfortable, currency),
            live_well = format_currency(tiers.gross_live_well, currency),
            rent = format_currency(tiers.monthly_rent_local, currency),
            essentials = format_currency(tiers.monthly_essentials_local, currency),
            total = format_currency(tiers.monthly_total_local(), currency),
            rate = tiers.effective_tax_rate,
            currency = escape_html(currency),
        )
    }

    fn neighborhood_table(
        &self,
        city: &CityView<'_>,
    ) -> String {
        let rows: Vec<String> = city
            .neighborhoods
            .iter()
            .map(|n| {
                let currency = n.tiers.currency.as_str();
                format!(
                    "                <tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    self.neighborhood_path(city.slug, &n.slug),
                    escape_html(&n.name),
                    format_currency(n.tiers.gross_get_by, currency),
                    format_currency(n.tiers.gross_comfortable, currency),
                    format_currency(n.tiers.gross_live_well, currency),
                )
            })
            .collect();

        format!(
            "
        <section class=\"content-card\">
            <h2>Salary Needed by Neighborhood</h2>
            <p>How much you need varies within {city}. Here is the breakdown for {count} neighborhoods:</p>
            <table>
                <thead><tr><th>Neighborhood</th><th>Get By</th><th>Comfortable</th><th>Live Well</th></tr></thead>
                <tbody>
{rows}                </tbody>
            </table>
        </section>
",
            city = escape_html(city.name),
            count = city.neighborhoods.len(),
            rows = rows.concat(),
        )
    }

    fn related_links(
        &self,
        city: &CityView<'_>,
        current: &NeighborhoodTiers,
    ) -> String {
        let city_name = escape_html(city.name);
        let mut links = vec![format!(
            "                <a href=\"{}\">All {city_name} neighborhoods</a>\n",
            self.city_path(city.slug)
        )];
        links.extend(
            city.neighborhoods
                .iter()
                .filter(|n| n.slug != current.slug)
                .take(MAX_RELATED)
                .map(|n| {
                    format!(
                        "                <a href=\"{}\">{}</a>\n",
                        self.neighborhood_path(city.slug, &n.slug),
                        escape_html(&n.name)
                    )
                }),
        );

        format!(
            "
        <section class=\"content-card\">
            <h2>More in {city_name}</h2>
            <div class=\"related-links\">
{}            </div>
        </section>
",
            links.concat()
        )
    }

    fn converter_cta(
        &self,
        city_name: &str,
    ) -> String {
        format!(
            "
        <section class=\"content-card cta\">
            <h2>Compare Your Salary</h2>
            <p>See what your current salary is worth in {}, or any other city.</p>
            <a href=\"/\">Open Salary Converter</a>
        </section>
",
            escape_html(city_name)
        )
    }

    // ─── layout ──────────────────────────────────────────────────────────────

    fn base_crumbs(&self) -> Vec<Crumb> {
        vec![
            Crumb {
                name: "Home".to_string(),
                path: "/".to_string(),
            },
            Crumb {
                name: "Salary Needed".to_string(),
                path: self.index_path(),
            },
        ]
    }

    fn breadcrumb_schema(
        &self,
        crumbs: &[Crumb],
        current: &str,
        canonical: &str,
    ) -> Value {
        let mut items: Vec<Value> = crumbs
            .iter()
            .enumerate()
            .map(|(i, crumb)| {
                json!({
                    "@type": "ListItem",
                    "position": i + 1,
                    "name": crumb.name,
                    "item": self.absolute(&crumb.path),
                })
            })
            .collect();
        items.push(json!({
            "@type": "ListItem",
            "position": crumbs.len() + 1,
            "name": current,
            "item": canonical,
        }));

        json!({
            "@context": "https://schema.org",
            "@type": "BreadcrumbList",
            "itemListElement": items,
        })
    }

    fn layout(
        &self,
        page: &Page,
    ) -> String {
        let title = escape_html(&page.title);
        let description = escape_html(&page.description);
        let canonical = escape_html(&page.canonical);

        let schemas: String = page
            .schemas
            .iter()
            .map(|schema| format!("    <script type=\"application/ld+json\">{}</script>\n", json_ld(schema)))
            .collect();

        let crumbs: String = page
            .crumbs
            .iter()
            .map(|crumb| format!("<a href=\"{}\">{}</a> › ", escape_html(&crumb.path), escape_html(&crumb.name)))
            .collect();

        format!(
            "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>{title} | {SITE_NAME}</title>
    <meta name=\"description\" content=\"{description}\">
    <meta name=\"robots\" content=\"index, follow\">
    <link rel=\"canonical\" href=\"{canonical}\">
    <meta property=\"og:type\" content=\"{og_type}\">
    <meta property=\"og:title\" content=\"{title}\">
    <meta property=\"og:description\" content=\"{description}\">
    <meta property=\"og:url\" content=\"{canonical}\">
    <meta property=\"og:site_name\" content=\"{SITE_NAME}\">
{schemas}</head>
<body>
    <div class=\"page-container\">
        <nav class=\"breadcrumb\">{crumbs}{current}</nav>

{body}
        <footer class=\"page-footer\">
            <a href=\"/\">Salary Converter</a>
            <a href=\"{index}\">All Cities</a>
        </footer>
    </div>
</body>
</html>
",
            og_type = page.og_type,
            current = escape_html(&page.current),
            body = page.body,
            index = escape_html(&self.index_path()),
        )
    }
}

fn faqs(
    display: &str,
    tiers: &SalaryTiers,
    year: i32,
) -> Vec<Faq> {
    let currency = tiers.currency.as_str();
    let get_by = format_currency(tiers.gross_get_by, currency);
    let comfortable = format_currency(tiers.gross_comfortable, currency);

    vec![
        Faq {
            question: format!("What salary do you need to live in {display}?"),
            answer: format!(
                "To live comfortably in {display} in {year}, you need a gross annual salary of approximately {comfortable}. This covers rent, groceries, utilities, transport and healthcare, and leaves 30% for wants and 20% for savings (50/30/20 rule). The minimum to get by is {get_by}."
            ),
        },
        Faq {
            question: format!("What is the cost of living in {display}?"),
            answer: format!(
                "Monthly rent for a 1-bedroom apartment in {display} is approximately {}. Essential monthly expenses (groceries, utilities, transport, healthcare) add roughly {}. The effective tax rate is {:.1}%.",
                format_currency(tiers.monthly_rent_local, currency),
                format_currency(tiers.monthly_essentials_local, currency),
                tiers.effective_tax_rate
            ),
        },
        Faq {
            question: format!("Is {get_by} enough to live in {display}?"),
            answer: format!(
                "{get_by} is the bare minimum salary to get by in {display}. It covers rent and essential expenses with very little left over. For a comfortable lifestyle with savings, you would want at least {comfortable}."
            ),
        },
    ]
}

fn faq_section(faqs: &[Faq]) -> String {
    let items: String = faqs
        .iter()
        .map(|faq| {
            format!(
                "            <div class=\"faq-item\">
                <h3>{}</h3>
                <p>{}</p>
            </div>
",
                escape_html(&faq.question),
                escape_html(&faq.answer)
            )
        })
        .collect();

    format!(
        "
        <section class=\"content-card\">
            <h2>Frequently Asked Questions</h2>
{items}        </section>
"
    )
}

fn faq_schema(faqs: &[Faq]) -> Value {
    let entities: Vec<Value> = faqs
        .iter()
        .map(|faq| {
            json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": { "@type": "Answer", "text": faq.answer },
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": entities,
    })
}
