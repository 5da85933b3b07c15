//! Result listing formatting and message-length chunking.
//!
//! After a batch of files has been relayed, the collected CDN URLs are rendered
//! into a human-readable listing and posted to the result channel. Discord caps
//! message length, so the listing is either split into multiple messages or,
//! past a threshold, shipped as a single attached text file instead of a wall
//! of messages.
//!
//! Entries are ordered by filename using natural comparison so `file2` lists
//! before `file10` regardless of the order uploads completed in.

use crate::{
    error::{upload::UploadError, AppError},
    model::upload::RelayedFile,
    util::natural::natural_cmp,
};

/// Filename used for the attachment fallback.
const LISTING_FILENAME: &str = "upload-results.txt";

/// Message-length policy for listing output.
///
/// Both bounds are policy, not protocol constants. The defaults stay below
/// Discord's 2000-character message limit so chunk labels and decoration fit
/// without re-measuring.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPolicy {
    /// Maximum rendered length of a single message chunk.
    pub max_chunk_len: usize,
    /// Total listing length above which the attachment fallback kicks in.
    pub attachment_threshold: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            max_chunk_len: 1900,
            attachment_threshold: 1900,
        }
    }
}

/// Formatted listing ready to be posted to the result channel.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedOutput {
    /// One Discord message per entry, labeled `(i/n)` when plural.
    Messages(Vec<String>),
    /// A single text file holding the whole listing.
    Attachment { filename: String, content: String },
}

/// Renders relayed files into listing output.
///
/// Sorts entries by filename (natural order), renders each as `name: url`, and
/// picks the delivery mode: listings longer than the attachment threshold
/// become a single text-file attachment, everything else is chunked into
/// inline messages. A single entry that cannot fit into one message fails the
/// whole request with no partial output.
///
/// # Arguments
/// - `files` - Relayed files in any order
/// - `policy` - Message-length policy
///
/// # Returns
/// - `Ok(FormattedOutput)` - Listing in sorted order
/// - `Err(AppError::UploadErr(EntryTooLarge))` - An entry exceeds the chunk bound
pub fn format_listing(
    mut files: Vec<RelayedFile>,
    policy: &ChunkPolicy,
) -> Result<FormattedOutput, AppError> {
    files.sort_by(|a, b| natural_cmp(&a.name, &b.name));

    let lines: Vec<String> = files
        .iter()
        .map(|file| format!("{}: {}", file.name, file.url))
        .collect();

    if let Some(oversize) = lines.iter().find(|line| line.len() > policy.max_chunk_len) {
        return Err(UploadError::EntryTooLarge {
            len: oversize.len(),
            limit: policy.max_chunk_len,
        }
        .into());
    }

    // Joined length counts the newline separators, same as the rendered text.
    let total: usize = lines.iter().map(String::len).sum::<usize>() + lines.len().saturating_sub(1);

    if total > policy.attachment_threshold {
        return Ok(FormattedOutput::Attachment {
            filename: LISTING_FILENAME.to_string(),
            content: lines.join("\n"),
        });
    }

    let chunks = chunk_lines(&lines, policy.max_chunk_len)?;

    if chunks.len() > 1 {
        let count = chunks.len();
        return Ok(FormattedOutput::Messages(
            chunks
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| format!("({}/{})\n{}", i + 1, count, chunk))
                .collect(),
        ));
    }

    Ok(FormattedOutput::Messages(chunks))
}

/// Splits rendered lines into chunks within a length bound.
///
/// Greedy accumulation: lines are appended to the current chunk until adding
/// the next line (plus its newline separator) would exceed `max_len`, at which
/// point a new chunk starts. Concatenating the chunks' lines in order yields
/// exactly the input.
///
/// # Arguments
/// - `lines` - Rendered lines in final display order
/// - `max_len` - Maximum chunk length in characters
///
/// # Returns
/// - `Ok(Vec<String>)` - Newline-joined chunks, each within `max_len`
/// - `Err(AppError::UploadErr(EntryTooLarge))` - A single line exceeds `max_len`
pub fn chunk_lines(lines: &[String], max_len: usize) -> Result<Vec<String>, AppError> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        if line.len() > max_len {
            return Err(UploadError::EntryTooLarge {
                len: line.len(),
                limit: max_len,
            }
            .into());
        }

        if !current.is_empty() && current.len() + 1 + line.len() > max_len {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relayed(name: &str, url: &str) -> RelayedFile {
        RelayedFile {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    fn policy(max_chunk_len: usize, attachment_threshold: usize) -> ChunkPolicy {
        ChunkPolicy {
            max_chunk_len,
            attachment_threshold,
        }
    }

    /// Tests the upload listing ordering scenario.
    ///
    /// Files arriving as b, a, c must list as a, b, c regardless of relay
    /// completion order.
    ///
    /// Expected: Ok with a single message starting at a.png
    #[test]
    fn listing_is_sorted_by_filename() {
        let files = vec![
            relayed("b.png", "https://cdn.example/2"),
            relayed("a.png", "https://cdn.example/1"),
            relayed("c.png", "https://cdn.example/3"),
        ];

        let output = format_listing(files, &ChunkPolicy::default()).unwrap();
        let FormattedOutput::Messages(messages) = output else {
            panic!("expected inline messages");
        };

        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            "a.png: https://cdn.example/1\nb.png: https://cdn.example/2\nc.png: https://cdn.example/3"
        );
    }

    /// Tests that numbered filenames sort naturally.
    ///
    /// Expected: file2 lists before file10
    #[test]
    fn listing_uses_natural_order() {
        let files = vec![
            relayed("file10.png", "https://cdn.example/10"),
            relayed("file2.png", "https://cdn.example/2"),
        ];

        let output = format_listing(files, &ChunkPolicy::default()).unwrap();
        let FormattedOutput::Messages(messages) = output else {
            panic!("expected inline messages");
        };

        assert!(messages[0].starts_with("file2.png:"));
    }

    /// Tests that every input entry appears in the output exactly once.
    ///
    /// Expected: Ok with N listed entries for N relayed files
    #[test]
    fn listing_preserves_entry_count() {
        let files: Vec<RelayedFile> = (0..25)
            .map(|i| relayed(&format!("clip{i}.mp4"), &format!("https://cdn.example/{i}")))
            .collect();

        let output = format_listing(files, &policy(100, 10_000)).unwrap();
        let FormattedOutput::Messages(messages) = output else {
            panic!("expected inline messages");
        };

        let listed: usize = messages
            .iter()
            .map(|m| m.lines().filter(|l| l.contains(": ")).count())
            .sum();
        assert_eq!(listed, 25);
    }

    /// Tests the chunking concatenation invariant.
    ///
    /// Concatenating all chunks' lines in order must reproduce exactly the
    /// input lines, and no chunk may exceed the bound.
    ///
    /// Expected: Ok with lossless, bounded chunks
    #[test]
    fn chunks_reproduce_input_within_bounds() {
        let lines: Vec<String> = (0..50).map(|i| format!("entry {i}")).collect();
        let max_len = 64;

        let chunks = chunk_lines(&lines, max_len).unwrap();
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|chunk| chunk.len() <= max_len));

        let rejoined: Vec<String> = chunks
            .iter()
            .flat_map(|chunk| chunk.lines().map(str::to_string))
            .collect();
        assert_eq!(rejoined, lines);
    }

    /// Tests that an empty line set produces no chunks.
    ///
    /// Expected: Ok with no output
    #[test]
    fn no_lines_produce_no_chunks() {
        let chunks = chunk_lines(&[], 100).unwrap();
        assert!(chunks.is_empty());
    }

    /// Tests the oversized-entry boundary.
    ///
    /// A single line longer than the bound must fail with EntryTooLarge and
    /// produce no partial output.
    ///
    /// Expected: Err(EntryTooLarge)
    #[test]
    fn oversized_line_fails_chunking() {
        let lines = vec!["short".to_string(), "x".repeat(101)];

        let result = chunk_lines(&lines, 100);
        assert!(matches!(
            result,
            Err(AppError::UploadErr(UploadError::EntryTooLarge { len: 101, limit: 100 }))
        ));
    }

    /// Tests that an oversized entry fails the listing as a whole.
    ///
    /// Expected: Err(EntryTooLarge) even though the total would have gone to
    /// the attachment fallback
    #[test]
    fn oversized_entry_fails_listing() {
        let files = vec![
            relayed("a.png", "https://cdn.example/1"),
            relayed(&"n".repeat(120), "https://cdn.example/2"),
        ];

        let result = format_listing(files, &policy(100, 150));
        assert!(matches!(
            result,
            Err(AppError::UploadErr(UploadError::EntryTooLarge { .. }))
        ));
    }

    /// Tests the attachment fallback for large listings.
    ///
    /// Expected: Ok with a single attachment carrying the full sorted listing
    #[test]
    fn large_listing_falls_back_to_attachment() {
        let files: Vec<RelayedFile> = (0..40)
            .map(|i| relayed(&format!("f{i}.png"), &format!("https://cdn.example/{i}")))
            .collect();

        let output = format_listing(files, &policy(100, 200)).unwrap();
        let FormattedOutput::Attachment { filename, content } = output else {
            panic!("expected attachment fallback");
        };

        assert_eq!(filename, "upload-results.txt");
        assert_eq!(content.lines().count(), 40);
        assert!(content.starts_with("f0.png:"));
    }

    /// Tests chunk labeling for multi-message output.
    ///
    /// Expected: Ok with position/total labels on each chunk, in input order
    #[test]
    fn plural_chunks_are_labeled() {
        let files: Vec<RelayedFile> = (1..=6)
            .map(|i| relayed(&format!("p{i}.png"), "https://cdn.example/x"))
            .collect();

        let output = format_listing(files, &policy(60, 1_000)).unwrap();
        let FormattedOutput::Messages(messages) = output else {
            panic!("expected inline messages");
        };

        assert!(messages.len() > 1);
        let count = messages.len();
        for (i, message) in messages.iter().enumerate() {
            assert!(message.starts_with(&format!("({}/{})\n", i + 1, count)));
        }
        assert!(messages[0].contains("p1.png"));
    }

    /// Tests that a single-chunk listing is not labeled.
    ///
    /// Expected: Ok with the bare listing text
    #[test]
    fn single_chunk_is_unlabeled() {
        let files = vec![relayed("only.png", "https://cdn.example/1")];

        let output = format_listing(files, &ChunkPolicy::default()).unwrap();
        let FormattedOutput::Messages(messages) = output else {
            panic!("expected inline messages");
        };

        assert_eq!(messages, vec!["only.png: https://cdn.example/1".to_string()]);
    }
}
