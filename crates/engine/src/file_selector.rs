// SPDX-License-Identifier: MIT

//! Produces an ordered candidate list for one feed (spec.md Section 4.3).

use bfq_adapters::Transport;
use bfq_core::{Feed, MoverError, SortKey};

/// Lists, filters, and orders the files a feed should consider moving.
pub struct FileSelector;

impl FileSelector {
    /// `candidates(feed)` per spec.md Section 4.3: list the source
    /// directory, keep only regular files, keep only names matching
    /// `source_fn`, drop anything still in flight (`*.temp`), sort, and
    /// truncate to `limit_total`.
    pub fn candidates(transport: &mut dyn Transport, feed: &Feed) -> Result<Vec<String>, MoverError> {
        let names = transport.list(&feed.source_dir)?;
        let pattern = glob::Pattern::new(&feed.source_fn).map_err(|e| {
            MoverError::Config(format!("bad source_fn glob {:?}: {e}", feed.source_fn))
        })?;

        let mut out = Vec::new();
        for name in names {
            let stat = transport.stat(&feed.source_dir.join(&name))?;
            if !stat.is_file || stat.is_symlink {
                continue;
            }
            if !pattern.matches(&name) {
                continue;
            }
            if name.ends_with(".temp") {
                continue;
            }
            out.push(name);
        }

        sort_candidates(&mut out, &feed.sort_key);

        if feed.limit_total > 0 {
            out.truncate(feed.limit_total);
        }

        Ok(out)
    }
}

fn sort_candidates(names: &mut [String], sort_key: &SortKey) {
    match sort_key {
        SortKey::None => {}
        SortKey::Name => names.sort(),
        SortKey::Field(label) => {
            names.sort_by(|a, b| field_key(a, label).cmp(&field_key(b, label)).then_with(|| a.cmp(b)));
        }
    }
}

/// Extract the substring following `<label>-` up to the next `.` or
/// `_`, used to sort by an embedded field such as a batch number. A
/// name with no match sorts as the empty string (first, stably broken
/// by name via the caller's tie-break).
fn field_key(name: &str, label: &str) -> String {
    let prefix = format!("{label}-");
    match name.find(prefix.as_str()) {
        Some(idx) => {
            let rest = &name[idx + prefix.len()..];
            let end = rest.find(['.', '_']).unwrap_or(rest.len());
            rest[..end].to_string()
        }
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "file_selector_tests.rs"]
mod tests;
