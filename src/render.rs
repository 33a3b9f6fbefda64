//! HTML page templates.
//!
//! Pure functions from documents to [`Markup`]: no file I/O, no clock, no
//! environment. The same input always renders the same bytes, which is what
//! makes rebuilds idempotent.
//!
//! Templates use [maud](https://maud.lambda.xyz/), so every interpolated
//! value (titles, tags, summaries) is HTML-escaped. The only pre-escaped
//! input is the body HTML produced by [`crate::markup`].
//!
//! ## Page kinds
//!
//! - **Listing page** (`basics.html`, ...): one card per note of a category,
//!   newest first, or an empty-state notice.
//! - **Detail page** (`notes/<slug>/index.html`): the full note. The
//!   `<article>` element carries `data-title`, `data-date` and
//!   `data-category`, and tags are rendered as `li.tag` chips, so the note's
//!   metadata can be read back out of the page.

use crate::category::Category;
use crate::config::SiteConfig;
use crate::document::Document;
use crate::route::CategoryGroup;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Relative path from a detail page back to the site root.
const DETAIL_ROOT: &str = "../../";
const EMPTY_STATE: &str = "暂时还没有内容，欢迎稍后再来。";

/// Link target of a note's detail page, relative to the site root.
pub fn detail_href(config: &SiteConfig, slug: &str) -> String {
    format!("{}/{}/", config.notes_dir, slug)
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(config: &SiteConfig, title: &str, root: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href={ (root) (config.stylesheet) };
            }
            body {
                (content)
                footer.site-footer {
                    p { "© " (config.site_title) }
                }
            }
        }
    }
}

/// Site header with brand and navigation; `current` is marked active.
fn site_header(config: &SiteConfig, current: Category, root: &str) -> Markup {
    html! {
        header.site-header {
            div.brand {
                span.brand-mark { (config.brand_mark) }
                div {
                    h1 { (config.site_title) }
                    p.tagline { (current.page_title()) }
                }
            }
            (render_nav(current, root))
        }
    }
}

pub fn render_nav(current: Category, root: &str) -> Markup {
    html! {
        nav.site-nav {
            a href={ (root) "index.html" } { "首页" }
            @for category in Category::ALL {
                a href={ (root) (category.listing_file()) }
                    class=[(category == current).then_some("active")] {
                    (category.page_title())
                }
            }
            a href={ (root) "contact.html" } { "联系我" }
        }
    }
}

fn hero(category: Category, content: Markup) -> Markup {
    html! {
        section class={ "hero hero-sub " (category.hero_class()) } {
            div.hero-copy {
                span.badge { (category.badge()) }
                (content)
            }
        }
    }
}

fn tag_chips(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tag-list {
                @for tag in tags {
                    li.tag { (tag) }
                }
            }
        }
    }
}

fn article_card(doc: &Document, config: &SiteConfig) -> Markup {
    html! {
        article.article-card id=(doc.slug) {
            header class="article-card__header" {
                h3 { (doc.title) }
                p class="article-card__meta" { (doc.date_display()) }
                (tag_chips(&doc.tags))
            }
            p class="article-card__summary" { (doc.summary) }
            div class="article-card__actions" {
                a class="article-card__link" href=(detail_href(config, &doc.slug)) { "阅读全文" }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Render the listing page of one category.
pub fn render_listing_page(group: &CategoryGroup, config: &SiteConfig) -> Markup {
    let category = group.category;
    let count = group.documents.len();

    let content = html! {
        (site_header(config, category, ""))
        main.content {
            (hero(category, html! {
                h1 { (category.page_title()) }
                p.listing-count {
                    "共 " (count) " 篇"
                }
            }))
            section.section.article-list data-category=(category.as_str()) {
                @if group.documents.is_empty() {
                    p.empty-state { (EMPTY_STATE) }
                } @else {
                    @for doc in &group.documents {
                        (article_card(doc, config))
                    }
                }
            }
        }
    };

    let title = format!("{} - {}", category.page_title(), config.site_title);
    base_document(config, &title, "", content)
}

/// Render the detail page of one note around its converted body HTML.
pub fn render_detail_page(doc: &Document, body_html: &str, config: &SiteConfig) -> Markup {
    let category = doc.category;

    let content = html! {
        (site_header(config, category, DETAIL_ROOT))
        main.content {
            (hero(category, html! {
                h1 { (doc.title) }
                p class="article-detail__meta" { (doc.meta_line()) }
                a class="article-detail__back" href={ (DETAIL_ROOT) (category.listing_file()) } {
                    "← 返回列表"
                }
            }))
            section.section.article-detail {
                article class="article-detail__card"
                    data-title=(doc.title)
                    data-date=[doc.date.map(|d| d.to_string())]
                    data-category=(category.as_str()) {
                    (tag_chips(&doc.tags))
                    (PreEscaped(body_html))
                }
            }
        }
    };

    let title = format!("{} - {}", doc.title, category.page_title());
    base_document(config, &title, DETAIL_ROOT, content)
}
