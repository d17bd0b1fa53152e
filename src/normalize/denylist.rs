/// One boilerplate pattern. `exempt_in_article` keeps matches that sit
/// inside an `<article>` (an article's own header or byline box).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoilerplateRule {
    pub selector: &'static str,
    pub exempt_in_article: bool,
}

const fn anywhere(selector: &'static str) -> BoilerplateRule {
    BoilerplateRule {
        selector,
        exempt_in_article: false,
    }
}

const fn outside_article(selector: &'static str) -> BoilerplateRule {
    BoilerplateRule {
        selector,
        exempt_in_article: true,
    }
}

/// Applied in order.
pub const BOILERPLATE: &[BoilerplateRule] = &[
    // non-content elements
    anywhere("script"),
    anywhere("style"),
    anywhere("iframe"),
    // page chrome
    outside_article("nav"),
    outside_article("header"),
    outside_article("footer"),
    anywhere("[role=\"banner\"]"),
    anywhere("[role=\"complementary\"]"),
    anywhere("[role=\"navigation\"]"),
    // ads
    anywhere(".advertisement"),
    anywhere(".ad"),
    anywhere(".ads"),
    anywhere(".adsense"),
    anywhere("[id*=\"ad-\"]"),
    anywhere("[class*=\"ad-\"]"),
    anywhere("[id*=\"google\"]"),
    anywhere("[class*=\"google\"]"),
    // social
    anywhere(".social-share"),
    anywhere(".share-buttons"),
    anywhere(".social-media"),
    anywhere(".follow-us"),
    anywhere(".subscribe"),
    // comments and reactions
    anywhere(".comments"),
    anywhere(".comment-section"),
    anywhere("#comments"),
    anywhere(".reactions"),
    anywhere(".rating"),
    // related content
    anywhere(".related-articles"),
    anywhere(".recommended"),
    anywhere(".suggestions"),
    anywhere(".more-from"),
    anywhere(".similar-posts"),
    // overlays and notices
    anywhere(".popup"),
    anywhere(".modal"),
    anywhere(".overlay"),
    anywhere(".cookie-notice"),
    anywhere(".gdpr"),
    anywhere(".newsletter-signup"),
    anywhere(".subscription"),
    // toolbars
    anywhere(".toolbar"),
    anywhere(".controls"),
    anywhere(".print-button"),
    anywhere(".font-settings"),
    // author metadata
    outside_article(".author-bio"),
    outside_article(".publish-date"),
    // site furniture
    anywhere(".site-header"),
    anywhere(".site-footer"),
    anywhere(".page-navigation"),
    anywhere(".breadcrumbs"),
    // trackers
    anywhere("[data-ad]"),
    anywhere("[data-analytics]"),
    anywhere("[data-tracking]"),
    anywhere("[data-sponsored]"),
];
