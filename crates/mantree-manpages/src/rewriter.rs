//! Heading and anchor rewriting for relocated pages.
//!
//! The generator writes every page as if it were a top-level document: the
//! command name is a level-2 heading and sections start at level 3. Once a
//! page moves one directory down it must read as a sub-page, so:
//!
//! | Generator line            | Rewritten line            |
//! |---------------------------|---------------------------|
//! | `###### Auto generated …` | *(dropped)*               |
//! | `## incus launch`         | ``# `incus launch` ``     |
//! | `### Options`             | `## Options`              |
//! | `#### Examples`           | `### Examples`            |
//! | anything else             | unchanged                 |
//!
//! The page is prefixed with a `(<flat-name>)=` anchor so links written
//! against the flat name keep resolving.

use std::borrow::Cow;

use crate::namespace::NamespacePath;
use crate::page::StagedPage;

/// A page ready to be written at its nested location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenPage {
    /// Destination location.
    pub path: NamespacePath,
    /// Anchor label; always the original flat filename.
    pub anchor: String,
    /// Full page content, anchor line first.
    pub content: String,
}

/// Rewrites staged pages for their nested destination.
#[derive(Debug, Clone)]
pub struct PageRewriter {
    boilerplate_marker: String,
}

impl PageRewriter {
    /// Create a rewriter that drops lines starting with `boilerplate_marker`.
    pub fn new(boilerplate_marker: impl Into<String>) -> Self {
        Self {
            boilerplate_marker: boilerplate_marker.into(),
        }
    }

    /// Rewrite `page` for the location described by `path`.
    pub fn rewrite(&self, page: &StagedPage, path: NamespacePath) -> RewrittenPage {
        if page.is_empty() {
            tracing::warn!(page = %page.file_name, "Staged page is empty, emitting anchor only");
        }

        let mut content = anchor_line(&page.file_name);
        for line in page.lines() {
            if let Some(rewritten) = self.rewrite_line(line) {
                content.push_str(&rewritten);
            }
        }

        RewrittenPage {
            path,
            anchor: page.file_name.clone(),
            content,
        }
    }

    /// Apply the first matching rule to a single line (ending included).
    ///
    /// Returns `None` when the line is dropped.
    pub fn rewrite_line<'a>(&self, line: &'a str) -> Option<Cow<'a, str>> {
        if line.starts_with(&self.boilerplate_marker) {
            return None;
        }
        if let Some(title) = line.strip_prefix("## ") {
            return Some(Cow::Owned(format!("# `{}`\n", title.trim_end())));
        }
        if line.starts_with("##") {
            return Some(Cow::Borrowed(&line[1..]));
        }
        Some(Cow::Borrowed(line))
    }
}

/// The anchor line and its trailing blank line.
pub fn anchor_line(flat_name: &str) -> String {
    format!("({flat_name})=\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rewriter() -> PageRewriter {
        PageRewriter::new("###### Auto generated")
    }

    fn rewrite(file_name: &str, content: &str) -> RewrittenPage {
        let path = NamespacePath::parse(file_name, '_').unwrap();
        rewriter().rewrite(&StagedPage::new(file_name, content), path)
    }

    #[test]
    fn test_rewrite_full_page() {
        let content = "\
## incus launch

Create and start instances from images

### Synopsis

```
incus launch [<remote>:]<image> [<remote>:][<name>] [flags]
```

### Options

#### Examples

###### Auto generated by spf13/cobra on 1-Jan-2025
";
        let page = rewrite("incus_launch.md", content);

        let expected = "\
(incus_launch.md)=

# `incus launch`

Create and start instances from images

## Synopsis

```
incus launch [<remote>:]<image> [<remote>:][<name>] [flags]
```

## Options

### Examples

";
        assert_eq!(page.content, expected);
        assert_eq!(page.anchor, "incus_launch.md");
    }

    #[test]
    fn test_anchor_is_first_two_lines() {
        let page = rewrite("root_child.md", "## root child\n");
        let mut lines = page.content.lines();
        assert_eq!(lines.next(), Some("(root_child.md)="));
        assert_eq!(lines.next(), Some(""));
    }

    #[test]
    fn test_heading_levels_shift_by_one() {
        let page = rewrite("a_b.md", "## title\n### two\n#### three\n");
        let levels: Vec<usize> = page
            .content
            .lines()
            .filter(|l| l.starts_with('#'))
            .map(|l| l.chars().take_while(|c| *c == '#').count())
            .collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert!(page.content.contains("# `title`\n"));
    }

    #[test]
    fn test_level_one_heading_unchanged() {
        assert_eq!(
            rewriter().rewrite_line("# Top\n"),
            Some(Cow::Borrowed("# Top\n"))
        );
    }

    #[test]
    fn test_double_hash_without_space_is_demoted() {
        // Only "## " is a title; "##x" is handled by the generic rule
        assert_eq!(
            rewriter().rewrite_line("##x\n"),
            Some(Cow::Borrowed("#x\n"))
        );
    }

    #[test]
    fn test_title_trailing_whitespace_trimmed() {
        assert_eq!(
            rewriter().rewrite_line("## incus list  \r\n").as_deref(),
            Some("# `incus list`\n")
        );
    }

    #[test]
    fn test_boilerplate_dropped_before_heading_rules() {
        assert_eq!(
            rewriter().rewrite_line("###### Auto generated by spf13/cobra\n"),
            None
        );
        // A deep heading that is not the marker is still demoted
        assert_eq!(
            rewriter().rewrite_line("###### Other\n").as_deref(),
            Some("##### Other\n")
        );
    }

    #[test]
    fn test_custom_marker() {
        let rewriter = PageRewriter::new("<!-- generated");
        assert_eq!(rewriter.rewrite_line("<!-- generated by tool -->\n"), None);
        assert_eq!(
            rewriter.rewrite_line("###### Auto generated\n").as_deref(),
            Some("##### Auto generated\n")
        );
    }

    #[test]
    fn test_empty_page_gets_anchor_only() {
        let page = rewrite("a_b.md", "");
        assert_eq!(page.content, "(a_b.md)=\n\n");
    }

    #[test]
    fn test_last_line_without_newline_kept() {
        let page = rewrite("a_b.md", "### Options\ntext");
        assert_eq!(page.content, "(a_b.md)=\n\n## Options\ntext");
    }

    #[test]
    fn test_body_lines_unchanged() {
        let line = "  incus launch images:debian/12 c1 # comment ## not a heading\n";
        assert_eq!(rewriter().rewrite_line(line), Some(Cow::Borrowed(line)));
    }
}
