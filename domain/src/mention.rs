//! Resolves which recipients a message explicitly mentions.
//!
//! Resolution is a pure function of the message text and a [`KeywordTable`]:
//! it never fails and keeps no state between calls.
//!
//! Text inside code (fenced, indented or inline), link destinations and link
//! titles never mentions anyone. Everything else, raw HTML included, is
//! tokenized on characters that cannot be part of a username, a custom
//! keyword or an emoji shortcode.

use crate::keywords::{KeywordTable, ALL_MENTION, CHANNEL_MENTION, HERE_MENTION};
use crate::Id;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use std::collections::HashSet;
use std::ops::Range;

/// Result of resolving mentions in one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplicitMentions {
    /// Every recipient mentioned, by name or through a channel-wide keyword.
    pub mentioned_user_ids: HashSet<Id>,
    /// Recipients reached through a username, first name or custom keyword.
    pub named_user_ids: HashSet<Id>,
    /// Recipients reached through `@channel` or `@all`.
    pub channel_wide_user_ids: HashSet<Id>,
    /// `@channel` or `@all` was used.
    pub channel_mentioned: bool,
    /// `@all` was used.
    pub all_mentioned: bool,
    /// `@here` was used. Who is online is decided by the caller.
    pub here_mentioned: bool,
    /// `@names` that matched nobody, in order of appearance, without the `@`.
    pub other_potential_mentions: Vec<String>,
}

impl ExplicitMentions {
    /// True when nothing at all was mentioned. Potential mentions don't count.
    pub fn is_empty(&self) -> bool {
        self.mentioned_user_ids.is_empty()
            && !self.channel_mentioned
            && !self.all_mentioned
            && !self.here_mentioned
    }
}

/// Resolves the explicit mentions of `message` against `keywords`.
pub fn explicit_mentions(message: &str, keywords: &KeywordTable) -> ExplicitMentions {
    let mut resolver = Resolver::new(keywords);
    resolver.process_text(&mention_enabled_text(message));
    resolver.finish()
}

struct Resolver<'a> {
    keywords: &'a KeywordTable,
    mentions: ExplicitMentions,
    /// Lower-cased matched tokens without the leading `@`.
    matched: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(keywords: &'a KeywordTable) -> Self {
        Self {
            keywords,
            mentions: ExplicitMentions::default(),
            matched: Vec::new(),
        }
    }

    fn process_text(&mut self, text: &str) {
        if contains_at_here(text) {
            self.mentions.here_mentioned = true;
        }

        for word in text.split(|c: char| !is_mention_char(c)) {
            if word.is_empty() || is_emoji_shortcode(word) {
                continue;
            }

            let word = word.trim_start_matches([':', '.', '-', '_']);
            if word.is_empty() {
                continue;
            }

            if self.check_for_mention(word) || self.check_without_trailing_periods(word) {
                continue;
            }

            if word.starts_with('@') {
                self.check_unmatched_at_mention(word);
            } else if word.contains(['.', '-', ':']) {
                // Possibly the end of a sentence or a hyphenated pair, look at each piece.
                for piece in word.split(['.', '-', ':']).filter(|p| !p.is_empty()) {
                    if self.check_for_mention(piece) {
                        continue;
                    }
                    if piece.len() > 1 && piece.starts_with('@') && !is_system_mention(piece) {
                        self.add_potential_mention(&piece[1..]);
                    }
                }
            }
        }
    }

    /// Removes trailing periods one at a time so the longest variant that is a
    /// keyword wins (`@user.name.` prefers `@user.name` over `@user`).
    fn check_without_trailing_periods(&mut self, word: &str) -> bool {
        let mut trimmed = word;
        while let Some(shorter) = trimmed.strip_suffix('.') {
            trimmed = shorter;
            if !trimmed.is_empty() && self.check_for_mention(trimmed) {
                return true;
            }
        }
        false
    }

    fn check_unmatched_at_mention(&mut self, word: &str) {
        let name = word.trim_end_matches(['.', '-', ':']);
        if name != word && self.check_for_mention(name) {
            return;
        }
        if name.len() <= 1 || is_system_mention(name) {
            return;
        }
        self.add_potential_mention(&name[1..]);
    }

    /// Looks `word` up in the table, returning true when it matched a keyword.
    /// Reserved tokens set their flags whether or not the table contains them.
    fn check_for_mention(&mut self, word: &str) -> bool {
        let lower = word.to_lowercase();

        match lower.as_str() {
            HERE_MENTION => self.mentions.here_mentioned = true,
            CHANNEL_MENTION => self.mentions.channel_mentioned = true,
            ALL_MENTION => {
                self.mentions.channel_mentioned = true;
                self.mentions.all_mentioned = true;
            }
            _ => {}
        }
        let channel_wide = is_system_mention(&lower);

        let mut matched = false;
        // Regular keywords are stored lower case.
        if let Some(ids) = self.keywords.get(&lower) {
            self.add_mentioned_users(ids, channel_wide);
            matched = true;
        }
        // First names are stored as written.
        if lower != word {
            if let Some(ids) = self.keywords.get(word) {
                self.add_mentioned_users(ids, channel_wide);
                matched = true;
            }
        }

        if matched {
            self.matched
                .push(lower.trim_start_matches('@').to_string());
        }
        matched
    }

    fn add_mentioned_users(&mut self, ids: &[Id], channel_wide: bool) {
        self.mentions.mentioned_user_ids.extend(ids.iter().copied());
        if channel_wide {
            self.mentions.channel_wide_user_ids.extend(ids.iter().copied());
        } else {
            self.mentions.named_user_ids.extend(ids.iter().copied());
        }
    }

    fn add_potential_mention(&mut self, name: &str) {
        self.mentions.other_potential_mentions.push(name.to_string());
    }

    /// Drops duplicate potential mentions and those that are only a prefix of
    /// something that did match (`user` when `@user.name` matched).
    fn finish(mut self) -> ExplicitMentions {
        let matched = self.matched;
        let mut seen = HashSet::new();

        self.mentions.other_potential_mentions.retain(|name| {
            let lower = name.to_lowercase();
            let consumed = matched.iter().any(|m| {
                m == &lower
                    || (m.starts_with(&lower) && m[lower.len()..].starts_with(['.', '-', '_']))
            });
            !consumed && seen.insert(lower)
        });

        self.mentions
    }
}

/// Characters that may be part of a username, keyword or emoji shortcode.
fn is_mention_char(c: char) -> bool {
    matches!(c, ':' | '.' | '-' | '_' | '@') || c.is_alphanumeric()
}

/// `:word:` is an emoji shortcode, never a mention.
fn is_emoji_shortcode(word: &str) -> bool {
    word.len() > 1 && word.starts_with(':') && word.ends_with(':')
}

fn is_system_mention(word: &str) -> bool {
    [HERE_MENTION, CHANNEL_MENTION, ALL_MENTION]
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

/// Boundary check for `@here`: not glued to a preceding letter or digit, not
/// continued by a letter, digit or underscore, and not the `:@here:` shortcode shape.
fn contains_at_here(text: &str) -> bool {
    let bytes = text.as_bytes();

    for (i, _) in text.match_indices('@') {
        let end = i + 1 + 4;
        if bytes.len() < end || !bytes[i + 1..end].eq_ignore_ascii_case(b"here") {
            continue;
        }

        let before = text[..i].chars().next_back();
        let after = text[end..].chars().next();

        if before.is_some_and(char::is_alphanumeric) {
            continue;
        }
        if after.is_some_and(|c| c.is_alphanumeric() || c == '_') {
            continue;
        }
        if before == Some(':') && after == Some(':') {
            continue;
        }
        return true;
    }

    false
}

/// Returns the parts of `message` in which mentions count.
///
/// Markdown is parsed only to locate code, link destinations/titles and link
/// reference definitions; those ranges are cut out of the raw source and
/// replaced by a line break. Everything else is kept verbatim, including
/// emphasis markers, which the tokenizer treats like any other punctuation.
fn mention_enabled_text(message: &str) -> String {
    let parser = Parser::new_ext(message, Options::ENABLE_STRIKETHROUGH);

    let mut excluded: Vec<Range<usize>> = parser
        .reference_definitions()
        .iter()
        .map(|(_, definition)| definition.span.clone())
        .collect();

    // (whole link range, end of the link text seen so far)
    let mut links: Vec<(Range<usize>, usize)> = Vec::new();

    for (event, range) in parser.into_offset_iter() {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => {
                links.push((range.clone(), range.start));
                continue;
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                if let Some((link, text_end)) = links.pop() {
                    excluded.push(text_end..link.end);
                    if let Some((_, parent_end)) = links.last_mut() {
                        *parent_end = (*parent_end).max(link.end);
                    }
                }
                continue;
            }
            Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => excluded.push(range.clone()),
            _ => {}
        }

        if let Some((_, text_end)) = links.last_mut() {
            *text_end = (*text_end).max(range.end);
        }
    }

    excluded.sort_by_key(|r| r.start);

    let mut text = String::with_capacity(message.len());
    let mut cursor = 0;
    for range in excluded {
        if range.start > cursor {
            text.push_str(&message[cursor..range.start]);
        }
        if range.end > cursor {
            text.push('\n');
            cursor = range.end;
        }
    }
    if cursor < message.len() {
        text.push_str(&message[cursor..]);
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[Id])]) -> KeywordTable {
        entries
            .iter()
            .map(|(keyword, ids)| (*keyword, ids.to_vec()))
            .collect()
    }

    fn ids(list: &[Id]) -> HashSet<Id> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_nobody() {
        let m = explicit_mentions("this is a message", &KeywordTable::new());
        assert_eq!(m, ExplicitMentions::default());
        assert!(m.is_empty());
    }

    #[test]
    fn test_nonexistent_user_is_potential_mention() {
        let m = explicit_mentions("this is a message for @user", &KeywordTable::new());
        assert!(m.is_empty());
        assert_eq!(m.other_potential_mentions, vec!["user"]);
    }

    #[test]
    fn test_one_person() {
        let id1 = Id::new_v4();
        let m = explicit_mentions("this is a message for @user", &table(&[("@user", &[id1])]));

        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert_eq!(m.named_user_ids, ids(&[id1]));
        assert!(!m.channel_mentioned && !m.all_mentioned && !m.here_mentioned);
        assert!(m.other_potential_mentions.is_empty());
    }

    #[test]
    fn test_one_person_with_period_at_end_of_username() {
        let id1 = Id::new_v4();
        let m = explicit_mentions(
            "this is a message for @user.name.",
            &table(&[("@user.name.", &[id1])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
    }

    #[test]
    fn test_exact_token_wins_over_period_trimmed_variant() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let m = explicit_mentions(
            "this is a message for @user.name.",
            &table(&[("@user.name.", &[id1]), ("@user.name", &[id2])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
    }

    #[test]
    fn test_one_person_at_end_of_sentence() {
        let id1 = Id::new_v4();
        let m = explicit_mentions("this is a message for @user.", &table(&[("@user", &[id1])]));
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert!(m.other_potential_mentions.is_empty());
    }

    #[test]
    fn test_keyword_without_at_sign() {
        let id1 = Id::new_v4();
        let m = explicit_mentions("this is a message for @user", &table(&[("this", &[id1])]));
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert_eq!(m.other_potential_mentions, vec!["user"]);
    }

    #[test]
    fn test_multiple_people_with_one_word() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let m = explicit_mentions(
            "this is a message for @user",
            &table(&[("@user", &[id1, id2])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1, id2]));
    }

    #[test]
    fn test_one_of_multiple_people() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let m = explicit_mentions(
            "this is a message for @user",
            &table(&[("@user", &[id1]), ("@mention", &[id2])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
    }

    #[test]
    fn test_multiple_people_with_multiple_words() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let m = explicit_mentions(
            "this is an @mention for @user",
            &table(&[("@user", &[id1]), ("@mention", &[id2])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1, id2]));
    }

    #[test]
    fn test_channel_in_any_case() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let keywords = table(&[("@channel", &[id1, id2])]);

        for message in ["this is an message for @channel", "this is an message for @cHaNNeL"] {
            let m = explicit_mentions(message, &keywords);
            assert_eq!(m.mentioned_user_ids, ids(&[id1, id2]), "{message}");
            assert_eq!(m.channel_wide_user_ids, ids(&[id1, id2]), "{message}");
            assert!(m.named_user_ids.is_empty());
            assert!(m.channel_mentioned);
            assert!(!m.all_mentioned);
        }
    }

    #[test]
    fn test_all_in_any_case() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let keywords = table(&[("@all", &[id1, id2])]);

        for message in ["this is an message for @all", "this is an message for @ALL"] {
            let m = explicit_mentions(message, &keywords);
            assert_eq!(m.mentioned_user_ids, ids(&[id1, id2]), "{message}");
            assert!(m.channel_mentioned);
            assert!(m.all_mentioned);
            assert!(m.other_potential_mentions.is_empty());
        }
    }

    #[test]
    fn test_channel_without_table_entry_sets_flag_but_mentions_nobody() {
        let m = explicit_mentions("hey @channel", &KeywordTable::new());
        assert!(m.channel_mentioned);
        assert!(m.mentioned_user_ids.is_empty());
        assert!(m.other_potential_mentions.is_empty());
    }

    #[test]
    fn test_user_with_period() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let m = explicit_mentions(
            "user.period doesn't complicate things at all by including periods in their username",
            &table(&[("user.period", &[id1]), ("user", &[id2])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
    }

    #[test]
    fn test_user_with_period_at_end_of_sentence() {
        let id1 = Id::new_v4();

        let m = explicit_mentions(
            "this is a message for @user.period.",
            &table(&[("@user.period", &[id1])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));

        let m = explicit_mentions(
            "this is a message for user.period.",
            &table(&[("user.period", &[id1])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
    }

    #[test]
    fn test_potential_out_of_channel_user() {
        let id1 = Id::new_v4();
        let m = explicit_mentions(
            "this is an message for @potential and @user",
            &table(&[("@user", &[id1])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert_eq!(m.other_potential_mentions, vec!["potential"]);
    }

    #[test]
    fn test_potential_out_of_channel_user_with_period() {
        let m = explicit_mentions("this is an message for @potential.user", &KeywordTable::new());
        assert!(m.mentioned_user_ids.is_empty());
        assert_eq!(m.other_potential_mentions, vec!["potential.user"]);
    }

    #[test]
    fn test_potential_mention_has_trailing_punctuation_trimmed() {
        let m = explicit_mentions("ask @potential. or @other-", &KeywordTable::new());
        assert_eq!(m.other_potential_mentions, vec!["potential", "other"]);
    }

    #[test]
    fn test_potential_mentions_are_deduplicated() {
        let m = explicit_mentions("@bob and @bob again", &KeywordTable::new());
        assert_eq!(m.other_potential_mentions, vec!["bob"]);
    }

    #[test]
    fn test_inline_code() {
        let keywords = table(&[("@channel", &[Id::new_v4()])]);
        let m = explicit_mentions("`this shouldn't mention @channel at all`", &keywords);
        assert!(m.is_empty());
    }

    #[test]
    fn test_fenced_code_block() {
        let m = explicit_mentions(
            "```\nthis shouldn't mention @channel at all\n```",
            &KeywordTable::new(),
        );
        assert!(m.is_empty());
    }

    #[test]
    fn test_indented_code_block() {
        let m = explicit_mentions("    this shouldn't mention @channel at all", &KeywordTable::new());
        assert!(m.is_empty());
    }

    #[test]
    fn test_link_title() {
        let m = explicit_mentions(
            r#"[foo](this "shouldn't mention @channel at all")"#,
            &KeywordTable::new(),
        );
        assert!(m.is_empty());
    }

    #[test]
    fn test_html_block_still_mentions() {
        let id1 = Id::new_v4();
        let keywords = table(&[("@user", &[id1]), ("@channel", &[id1])]);

        let m = explicit_mentions("<div>@user</div>", &keywords);
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));

        let m = explicit_mentions("<div>\n@channel\n</div>", &keywords);
        assert!(m.channel_mentioned);
        assert_eq!(m.channel_wide_user_ids, ids(&[id1]));

        let m = explicit_mentions("<p>\n@user please look\n</p>", &keywords);
        assert_eq!(m.named_user_ids, ids(&[id1]));
    }

    #[test]
    fn test_html_comment_and_inline_html_still_mention() {
        let id1 = Id::new_v4();
        let keywords = table(&[("@user", &[id1])]);

        for message in ["<!-- @user -->", "<b>@user</b>", "see <span>@user</span> now"] {
            let m = explicit_mentions(message, &keywords);
            assert_eq!(m.mentioned_user_ids, ids(&[id1]), "{message}");
        }
        assert!(explicit_mentions("<div>@here</div>", &keywords).here_mentioned);
    }

    #[test]
    fn test_link_text_still_mentions() {
        let id1 = Id::new_v4();
        let m = explicit_mentions(
            "[ping @user](https://example.com/@other)",
            &table(&[("@user", &[id1])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert!(m.other_potential_mentions.is_empty());
    }

    #[test]
    fn test_malformed_inline_code_still_mentions() {
        let m = explicit_mentions("`this should mention @channel``", &KeywordTable::new());
        assert!(m.channel_mentioned);
    }

    #[test]
    fn test_markdown_markers_do_not_suppress_mentions() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let id3 = Id::new_v4();
        let keywords = table(&[("@aaa", &[id1]), ("@bbb", &[id2]), ("@ccc", &[id3])]);

        for message in ["*@aaa @bbb @ccc*", "**@aaa @bbb @ccc**", "~~@aaa @bbb @ccc~~"] {
            let m = explicit_mentions(message, &keywords);
            assert_eq!(m.mentioned_user_ids, ids(&[id1, id2, id3]), "{message}");
        }

        for message in ["### @aaa", "> @aaa"] {
            let m = explicit_mentions(message, &keywords);
            assert_eq!(m.mentioned_user_ids, ids(&[id1]), "{message}");
        }
    }

    #[test]
    fn test_emoji_shortcodes() {
        let id1 = Id::new_v4();
        let id2 = Id::new_v4();
        let id3 = Id::new_v4();
        let keywords = table(&[("smile", &[id1]), ("smiley", &[id2]), ("smiley_cat", &[id3])]);

        assert!(explicit_mentions(":smile:", &keywords).is_empty());

        for message in ["smile", ":smile", "smile:"] {
            let m = explicit_mentions(message, &keywords);
            assert_eq!(m.mentioned_user_ids, ids(&[id1]), "{message}");
        }
    }

    #[test]
    fn test_part_of_actual_mention_is_not_potential_mention() {
        let id1 = Id::new_v4();

        for message in [
            "this is an message for @user.name",
            "this is an message for @user.name.",
            "this is an message for @user.name...",
        ] {
            let m = explicit_mentions(message, &table(&[("@user.name", &[id1])]));
            assert_eq!(m.mentioned_user_ids, ids(&[id1]), "{message}");
            assert!(m.other_potential_mentions.is_empty(), "{message}");
        }

        let m = explicit_mentions(
            "this is an message for @user...name...",
            &table(&[("@user...name", &[id1])]),
        );
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert!(m.other_potential_mentions.is_empty());
    }

    #[test]
    fn test_prefix_of_matched_mention_is_dropped_from_potentials() {
        let id1 = Id::new_v4();
        let m = explicit_mentions("@user and @user.name", &table(&[("@user.name", &[id1])]));
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert!(m.other_potential_mentions.is_empty());
    }

    #[test]
    fn test_longest_match_without_at_sign() {
        let id1 = Id::new_v4();
        let m = explicit_mentions("user...name...", &table(&[("user...name", &[id1])]));
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert!(m.other_potential_mentions.is_empty());
    }

    #[test]
    fn test_first_name_is_case_sensitive() {
        let id1 = Id::new_v4();
        let keywords = table(&[("First", &[id1])]);

        assert_eq!(explicit_mentions("hi First", &keywords).mentioned_user_ids, ids(&[id1]));
        assert!(explicit_mentions("hi first", &keywords).mentioned_user_ids.is_empty());
    }

    #[test]
    fn test_lower_case_keywords_match_any_case() {
        let id1 = Id::new_v4();
        let m = explicit_mentions("hello @USER", &table(&[("@user", &[id1])]));
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let id1 = Id::new_v4();
        let keywords = table(&[("@user", &[id1]), ("@channel", &[id1])]);
        let message = "@here @user @channel @potential `@code` :smile:";

        assert_eq!(
            explicit_mentions(message, &keywords),
            explicit_mentions(message, &keywords)
        );
    }

    #[test]
    fn test_at_here_boundaries() {
        let cases = [
            ("", false),
            ("here", false),
            ("@here", true),
            (" @here ", true),
            ("\n@here\n", true),
            ("!@here!", true),
            ("#@here#", true),
            ("$@here$", true),
            ("%@here%", true),
            ("^@here^", true),
            ("&@here&", true),
            ("*@here*", true),
            ("(@here(", true),
            (")@here)", true),
            ("-@here-", true),
            ("_@here_", false),
            ("=@here=", true),
            ("+@here+", true),
            ("[@here[", true),
            ("{@here{", true),
            ("]@here]", true),
            ("}@here}", true),
            ("\\@here\\", true),
            ("|@here|", true),
            (";@here;", true),
            (":@here:", false),
            ("'@here'", true),
            ("\"@here\"", true),
            (",@here,", true),
            ("<@here<", true),
            (".@here.", true),
            (">@here>", true),
            ("/@here/", true),
            ("?@here?", true),
            ("`@here`", false),
            ("~@here~", true),
            ("@HERE", true),
            ("@hERe", true),
        ];

        for (message, should_mention) in cases {
            let m = explicit_mentions(message, &KeywordTable::new());
            assert_eq!(
                m.here_mentioned, should_mention,
                "unexpected @here result for {message:?}"
            );
        }
    }

    #[test]
    fn test_here_with_user_and_potential() {
        let id1 = Id::new_v4();
        let m = explicit_mentions("@here @user @potential", &table(&[("@user", &[id1])]));

        assert!(m.here_mentioned);
        assert!(!m.channel_mentioned);
        assert_eq!(m.mentioned_user_ids, ids(&[id1]));
        assert_eq!(m.other_potential_mentions, vec!["potential"]);
    }

    #[test]
    fn test_mention_enabled_text_cuts_code_and_link_tails() {
        let text = mention_enabled_text("a `b` [c](d \"e\") f");
        assert!(!text.contains('b'));
        assert!(!text.contains('d'));
        assert!(!text.contains('e'));
        assert!(text.contains('a') && text.contains('c') && text.contains('f'));
    }
}
