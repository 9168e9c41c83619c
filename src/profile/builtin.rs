use super::{ProfileKind, SiteProfile, GENERIC_PROFILE};
use crate::ProfileError;

/// Builds the built-in profile for a kind
pub(super) fn profile(kind: ProfileKind) -> Result<SiteProfile, ProfileError> {
    let profile = match kind {
        ProfileKind::GitBook => SiteProfile::new(kind, "gitbook", "GitBook documentation")
            .with_hostnames(&["gitbook.io", "gitbook.com"])
            .with_meta_generator(&["GitBook"])
            .with_url_patterns(&[r"\.gitbook\.io", r"\.gitbook\.com"])?
            .with_content_selectors(&[".markdown-section", ".page-inner", "article", ".content"])
            .with_navigation_selectors(&[".book-summary", ".summary", "nav.book-summary"])
            .with_ignore_selectors(&[".page-footer", ".markdown-section > div.gitbook-plugin"]),

        ProfileKind::Docusaurus => {
            SiteProfile::new(kind, "docusaurus", "Docusaurus documentation")
                .with_hostnames(&["docusaurus.io"])
                .with_meta_generator(&["Docusaurus"])
                .with_url_patterns(&[r"\.docusaurus\.io"])?
                .with_content_selectors(&["article.docusaurus-content", ".markdown", "main article"])
                .with_navigation_selectors(&[".menu__list", "nav.menu", ".table-of-contents"])
                .with_ignore_selectors(&[
                    ".theme-edit-this-page",
                    ".theme-last-updated",
                    ".docs-prevnext",
                ])
        }

        ProfileKind::MkDocs => SiteProfile::new(kind, "mkdocs", "MkDocs documentation")
            .with_hostnames(&["mkdocs.org"])
            .with_meta_generator(&["MkDocs", "mkdocs"])
            .with_url_patterns(&[r"\.mkdocs\.org"])?
            .with_content_selectors(&[".md-content__inner", "article.md-content__inner", "div.content"])
            .with_navigation_selectors(&[".md-sidebar__inner", ".md-sidebar--primary", "nav.md-nav"])
            .with_ignore_selectors(&[".md-footer", ".md-footer-nav"]),

        ProfileKind::ReadTheDocs => {
            SiteProfile::new(kind, "readthedocs", "ReadTheDocs (Sphinx) documentation")
                .with_hostnames(&["readthedocs.io", "readthedocs.org"])
                .with_meta_generator(&["Sphinx"])
                .with_url_patterns(&[r"\.readthedocs\.io", r"\.readthedocs\.org"])?
                .with_content_selectors(&[".document", ".body", r#"div[role="main"]"#, ".rst-content"])
                .with_navigation_selectors(&[".wy-nav-side", ".sphinxsidebar", "nav.wy-nav-side"])
                .with_ignore_selectors(&[
                    ".rst-footer-buttons",
                    ".sourcelink",
                    ".headerlink",
                    ".viewcode-link",
                ])
        }

        ProfileKind::VuePress => SiteProfile::new(kind, "vuepress", "VuePress documentation")
            .with_hostnames(&["vuepress.vuejs.org"])
            .with_meta_generator(&["VuePress"])
            .with_url_patterns(&[r"\.vuepress\."])?
            .with_content_selectors(&[".theme-default-content", ".content", "main.page"])
            .with_navigation_selectors(&[".sidebar", ".sidebar-links", "aside.sidebar"])
            .with_ignore_selectors(&[".page-edit", ".page-nav", ".edit-link", ".last-updated"]),

        ProfileKind::Hugo => SiteProfile::new(kind, "hugo", "Hugo documentation")
            .with_hostnames(&["gohugo.io"])
            .with_meta_generator(&["Hugo"])
            .with_url_patterns(&[r"\.gohugo\.io"])?
            .with_content_selectors(&[".content", "main", "article.content"])
            .with_navigation_selectors(&[".menu", "nav.menu", ".sidebar"])
            .with_ignore_selectors(&[".footer", "footer", ".edit-page"]),

        ProfileKind::Docsify => SiteProfile::new(kind, "docsify", "Docsify documentation")
            .with_hostnames(&["docsify.js.org"])
            .with_meta_generator(&["docsify"])
            .with_url_patterns(&[r"\.docsify\."])?
            .with_content_selectors(&[".content", "#main", "section.content"])
            .with_navigation_selectors(&[".sidebar", ".sidebar-nav", "aside"])
            .with_ignore_selectors(&[".docsify-pagination", ".edit-link"]),

        ProfileKind::NextJs => SiteProfile::new(kind, "nextjs", "Next.js documentation")
            .with_hostnames(&["nextjs.org"])
            .with_meta_generator(&["Next.js"])
            .with_url_patterns(&[r"\.nextjs\.org"])?
            .with_content_selectors(&[".docs-content", "main", "article", ".content"])
            .with_navigation_selectors(&[".sidebar", "nav", ".docs-sidebar"])
            .with_ignore_selectors(&[".footer", "footer", ".edit-page-link"]),

        ProfileKind::AiDocs => SiteProfile::new(kind, "ai_docs", "AI platform documentation")
            .with_hostnames(&["anthropic.com", "claude.ai", "openai.com"])
            .with_url_patterns(&[r"\.anthropic\.com", r"\.claude\.ai", r"\.openai\.com", "/docs"])?
            .with_content_selectors(&[".content", "main", "article", ".documentation", ".docs-content"])
            .with_navigation_selectors(&[".sidebar", "nav", ".navigation", ".docs-navigation"])
            .with_ignore_selectors(&[
                ".footer",
                "footer",
                ".header",
                "header",
                ".feedback",
                ".edit-link",
            ]),

        ProfileKind::Generic => generic(),

        ProfileKind::Custom => SiteProfile::new(kind, "custom", ""),
    };

    Ok(profile)
}

/// The catch-all profile with broad selectors
pub(super) fn generic() -> SiteProfile {
    SiteProfile::new(
        ProfileKind::Generic,
        GENERIC_PROFILE,
        "Heuristic profile for any documentation site",
    )
    .with_content_selectors(&[
        "article",
        "main",
        ".content",
        ".markdown-body",
        ".markdown-section",
        ".documentation",
        ".docs-content",
        ".post-content",
        ".entry-content",
        r#"div[role="main"]"#,
        ".container main",
        "div.body",
        "#content",
    ])
    .with_navigation_selectors(&[
        ".sidebar",
        ".table-of-contents",
        ".menu",
        "nav",
        ".navigation",
        "aside",
        ".toc",
        "#toc",
        ".nav-wrapper",
        "ul.summary",
        ".sphinx-sidebar",
        "#sidebar",
    ])
    .with_ignore_selectors(&[
        "footer",
        "header",
        ".admonition",
        ".github-fork-ribbon",
        ".edit-link",
        ".feedback",
        ".page-footer",
        "script",
        "style",
        ".navigation",
        ".page-nav",
        ".next-prev-links",
        ".disqus",
        "#disqus_thread",
        ".comments",
        ".article-footer",
        ".sharing",
        ".related-posts",
    ])
}
