use serde::Deserialize;

/// Work-branch name derived from an issue. The derivation is fixed:
/// other tooling matches branches back to issues by this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<iid>-<slug>` where the slug lower-cases the title, drops `:`
    /// and `)`, turns `(` into a space, and collapses whitespace runs
    /// into single hyphens.
    pub fn for_issue(iid: u64, title: &str) -> Self {
        Self(format!("{iid}-{}", slugify(title)))
    }
}

fn slugify(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ':' | ')' => None,
            '(' => Some(' '),
            other => Some(other),
        })
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    let mut in_gap = false;
    for c in cleaned.chars() {
        if c.is_whitespace() {
            in_gap = true;
            continue;
        }
        if in_gap && !slug.is_empty() {
            slug.push('-');
        }
        in_gap = false;
        slug.push(c);
    }
    slug
}

/// Branch record returned by the platform after creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBranch {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_punctuated_title() {
        let branch = BranchName::for_issue(42, "Fix: Login (OAuth) Bug");
        assert_eq!(branch.as_str(), "42-fix-login-oauth-bug");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let branch = BranchName::for_issue(7, "Add   new\tsearch  page");
        assert_eq!(branch.as_str(), "7-add-new-search-page");
    }

    #[test]
    fn keeps_already_clean_titles() {
        let branch = BranchName::for_issue(1, "update dependencies");
        assert_eq!(branch.as_str(), "1-update-dependencies");
    }

    #[test]
    fn leading_and_trailing_whitespace_does_not_dangle_hyphens() {
        let branch = BranchName::for_issue(3, "  (Spike) evaluate cache  ");
        assert_eq!(branch.as_str(), "3-spike-evaluate-cache");
    }
}
