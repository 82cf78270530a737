use crate::categories;

/// Alternate spellings that mark a tool submission alongside the category
/// name itself.
const TOOL_MARKS: [&str; 2] = [categories::TOOL, "工具推荐"];
const ARTICLE_MARKS: [&str; 2] = [categories::ARTICLE, "文章推荐"];

/// Title-derived flags. The four checks are independent, so a title can
/// carry any subset of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub open_source: bool,
    pub tool: bool,
    pub website: bool,
    pub article: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    OpenSource,
    Tool,
    Website,
    Article,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::OpenSource, Kind::Tool, Kind::Website, Kind::Article];

    pub fn category_name(self) -> &'static str {
        match self {
            Kind::OpenSource => categories::OPEN_SOURCE,
            Kind::Tool => categories::TOOL,
            Kind::Website => categories::WEBSITE,
            Kind::Article => categories::ARTICLE,
        }
    }

    /// Two-character badge used in list rows where space is tight.
    pub fn badge(self) -> &'static str {
        match self {
            Kind::OpenSource => "开源",
            Kind::Tool => "工具",
            Kind::Website => "网站",
            Kind::Article => "文章",
        }
    }
}

impl Classification {
    fn matches(&self, kind: Kind) -> bool {
        match kind {
            Kind::OpenSource => self.open_source,
            Kind::Tool => self.tool,
            Kind::Website => self.website,
            Kind::Article => self.article,
        }
    }

    /// First matching kind in category order, used to tint list rows.
    pub fn primary(&self) -> Option<Kind> {
        Kind::ALL.into_iter().find(|kind| self.matches(*kind))
    }

    /// Every matching kind in category order.
    pub fn kinds(&self) -> Vec<Kind> {
        Kind::ALL
            .into_iter()
            .filter(|kind| self.matches(*kind))
            .collect()
    }
}

/// Flag a title by substring search. Depends on nothing but the title, so
/// classifying the same title twice always agrees.
pub fn classify(title: &str) -> Classification {
    Classification {
        open_source: title.contains(categories::OPEN_SOURCE),
        tool: TOOL_MARKS.iter().any(|mark| title.contains(mark)),
        website: title.contains(categories::WEBSITE),
        article: ARTICLE_MARKS.iter().any(|mark| title.contains(mark)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_title_matches_nothing() {
        assert_eq!(classify("周刊第 300 期反馈"), Classification::default());
    }

    #[test]
    fn each_mark_sets_exactly_its_flag() {
        assert!(classify("开源自荐:一个终端工具箱").open_source);
        assert!(classify("工具自荐 - 截图工具").tool);
        assert!(classify("工具推荐:好用的笔记软件").tool);
        assert!(classify("网站自荐 | 在线配色").website);
        assert!(classify("文章自荐:聊聊缓存").article);
        assert!(classify("文章推荐 浏览器往事").article);
    }

    #[test]
    fn alternate_tool_mark_does_not_leak_into_other_flags() {
        let classification = classify("工具推荐:好用的笔记软件");
        assert_eq!(
            classification,
            Classification {
                tool: true,
                ..Classification::default()
            }
        );
    }

    #[test]
    fn checks_are_independent() {
        let classification = classify("开源自荐 + 工具推荐:自己写的播放器");
        assert!(classification.open_source);
        assert!(classification.tool);
        assert!(!classification.website);
        assert!(!classification.article);
        assert_eq!(classification.kinds(), vec![Kind::OpenSource, Kind::Tool]);
        assert_eq!(classification.primary(), Some(Kind::OpenSource));
    }

    #[test]
    fn mark_matches_anywhere_in_the_title() {
        assert!(classify("这是一个网站自荐").website);
        assert_eq!(classify("自荐网站"), Classification::default());
    }

    #[test]
    fn classification_is_idempotent() {
        let title = "开源自荐:文章推荐引擎";
        assert_eq!(classify(title), classify(title));
    }
}
