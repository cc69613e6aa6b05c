//! Pattern matcher
//!
//! Applies one rule to the working span list. The span list always covers the whole
//! source in order; each span is either still unmatched or already a token. Tokens are
//! opaque to every later rule, so text is never classified twice.
//!
//! Non-greedy rules only see the text of one unmatched span at a time: `^`, `$` and `\b`
//! treat the span edges as text edges. After a match, the text to its right is scanned
//! again by the same rule.
//!
//! Greedy rules search the whole source, starting at each unmatched span. A match that
//! starts inside a token is ignored. A match that runs past its span absorbs the spans it
//! covers: absorbed tokens are discarded and the uncovered tail of the last one becomes
//! unmatched text again. Discarding is reported back so the builder can run another pass.
//!
//! A zero-length token is never produced. The search resumes after the empty match (after
//! the whole match when only the captured group was empty), which keeps every rule
//! moving forward whatever its pattern.

use crate::grammar::Rule;

/// How a span of the source is currently classified.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SpanKind<'g> {
    Unmatched,
    Matched { kind: &'g str, rule: &'g Rule },
}

/// Byte range of the source plus its classification.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Span<'g> {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind<'g>,
}

impl<'g> Span<'g> {
    fn unmatched(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Unmatched,
        }
    }

    fn matched(start: usize, end: usize, kind: &'g str, rule: &'g Rule) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Matched { kind, rule },
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self.kind, SpanKind::Unmatched)
    }

    fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// What applying one rule did to the span list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RuleOutcome {
    pub matches: usize,
    /// Earlier tokens were discarded by a greedy match
    pub reopened: bool,
}

/// A candidate located by a rule, in source offsets.
#[derive(Debug, Clone, Copy)]
struct Found {
    /// Start of the whole pattern match
    origin: usize,
    /// End of the whole pattern match
    finish: usize,
    start: usize,
    end: usize,
}

impl Found {
    fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Where to search again after an empty token, `None` at the end of `haystack`.
    fn resume(&self, haystack: &str) -> Option<usize> {
        if self.finish > self.origin {
            return Some(self.finish);
        }
        haystack[self.origin..]
            .chars()
            .next()
            .map(|c| self.origin + c.len_utf8())
    }
}

/// Outcome of a greedy search from one unmatched span.
enum Search {
    Hit(Found),
    /// Nothing usable starts inside the span
    Later,
    /// Nothing matches anywhere further right
    Exhausted,
}

/// Search `haystack` from `from`, resolving the token boundaries of the rule.
///
/// With `capture`, group 1 delimits the token when it participates in the match.
fn locate(rule: &Rule, haystack: &str, from: usize) -> Option<Found> {
    if rule.captures() {
        let caps = rule.regex().captures_at(haystack, from)?;
        let whole = caps.get(0)?;
        let focus = caps.get(1).unwrap_or(whole);
        Some(Found {
            origin: whole.start(),
            finish: whole.end(),
            start: focus.start(),
            end: focus.end(),
        })
    } else {
        let m = rule.regex().find_at(haystack, from)?;
        Some(Found {
            origin: m.start(),
            finish: m.end(),
            start: m.start(),
            end: m.end(),
        })
    }
}

/// Working span list for one call of the engine.
pub(crate) struct MatchState<'s, 'g> {
    source: &'s str,
    spans: Vec<Span<'g>>,
}

impl<'s, 'g> MatchState<'s, 'g> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            spans: vec![Span::unmatched(0, source.len())],
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn into_spans(self) -> Vec<Span<'g>> {
        self.spans
    }

    /// Apply `rule` to every unmatched span, tagging matches as `kind`.
    pub fn apply(&mut self, kind: &'g str, rule: &'g Rule) -> RuleOutcome {
        if rule.is_greedy() {
            self.apply_greedy(kind, rule)
        } else {
            self.apply_local(kind, rule)
        }
    }

    fn apply_local(&mut self, kind: &'g str, rule: &'g Rule) -> RuleOutcome {
        let spans = std::mem::take(&mut self.spans);
        let mut out = Vec::with_capacity(spans.len());
        let mut outcome = RuleOutcome::default();

        for span in spans {
            if !span.is_unmatched() || span.is_empty() {
                out.push(span);
                continue;
            }
            outcome.matches += self.split_region(kind, rule, span.start, span.end, &mut out);
        }

        self.spans = out;
        outcome
    }

    /// Match `rule` repeatedly inside `source[start..end]`, each time on the text right of
    /// the previous match.
    fn split_region(
        &self,
        kind: &'g str,
        rule: &'g Rule,
        mut start: usize,
        end: usize,
        out: &mut Vec<Span<'g>>,
    ) -> usize {
        let mut matches = 0;
        let mut from = 0;

        while start < end {
            let region = &self.source[start..end];
            let found = match locate(rule, region, from) {
                Some(found) => found,
                None => break,
            };
            if found.is_empty() {
                match found.resume(region) {
                    Some(next) => {
                        from = next;
                        continue;
                    }
                    None => break,
                }
            }

            if found.start > 0 {
                out.push(Span::unmatched(start, start + found.start));
            }
            out.push(Span::matched(
                start + found.start,
                start + found.end,
                kind,
                rule,
            ));
            matches += 1;
            start += found.end;
            from = 0;
        }

        if start < end {
            out.push(Span::unmatched(start, end));
        }
        matches
    }

    fn apply_greedy(&mut self, kind: &'g str, rule: &'g Rule) -> RuleOutcome {
        let mut spans = std::mem::take(&mut self.spans);
        let mut out = Vec::with_capacity(spans.len() + 2);
        let mut outcome = RuleOutcome::default();

        let mut cache: Option<(usize, Option<Found>)> = None;

        let mut i = 0;
        while i < spans.len() {
            let span = spans[i];
            if !span.is_unmatched() || span.is_empty() {
                out.push(span);
                i += 1;
                continue;
            }

            let found = match self.search(rule, span, &mut cache) {
                Search::Hit(found) => found,
                // Starts further right, possibly inside a token; later spans search again.
                Search::Later => {
                    out.push(span);
                    i += 1;
                    continue;
                }
                Search::Exhausted => {
                    out.extend_from_slice(&spans[i..]);
                    break;
                }
            };

            let mut last = i;
            while last + 1 < spans.len() && spans[last].end < found.end {
                last += 1;
            }
            if spans[i + 1..=last].iter().any(|s| !s.is_unmatched()) {
                outcome.reopened = true;
            }

            if found.start > span.start {
                out.push(Span::unmatched(span.start, found.start));
            }
            out.push(Span::matched(found.start, found.end, kind, rule));
            outcome.matches += 1;

            let tail_end = spans[last].end;
            if found.end < tail_end {
                spans[last] = Span::unmatched(found.end, tail_end);
                i = last;
            } else {
                i = last + 1;
            }
        }

        self.spans = out;
        outcome
    }

    /// Leftmost non-empty match of a greedy `rule` that starts inside `span`.
    ///
    /// The leftmost match found from `from` is also the leftmost match from any later
    /// position up to its origin, so one cached search serves several spans.
    fn search(
        &self,
        rule: &Rule,
        span: Span<'g>,
        cache: &mut Option<(usize, Option<Found>)>,
    ) -> Search {
        let mut from = span.start;
        loop {
            let hit = match *cache {
                Some((at, hit)) if at <= from && hit.map_or(true, |f| from <= f.origin) => hit,
                _ => {
                    let hit = locate(rule, self.source, from);
                    *cache = Some((from, hit));
                    hit
                }
            };

            let found = match hit {
                Some(found) => found,
                None => return Search::Exhausted,
            };
            if found.start >= span.end {
                return Search::Later;
            }
            if !found.is_empty() {
                return Search::Hit(found);
            }
            match found.resume(self.source) {
                Some(next) if next < span.end => from = next,
                _ => return Search::Later,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, RuleSpec};

    fn rule(spec: RuleSpec) -> Grammar {
        Grammar::builder().rule("t", spec).build().unwrap()
    }

    fn first_rule(grammar: &Grammar) -> &Rule {
        &grammar.entries()[0].rules()[0]
    }

    /// Render spans as `[token]` and `raw` pieces for compact assertions.
    fn render(source: &str, spans: &[Span<'_>]) -> String {
        spans
            .iter()
            .map(|span| {
                let text = &source[span.start..span.end];
                if span.is_unmatched() {
                    text.to_string()
                } else {
                    format!("[{text}]")
                }
            })
            .collect()
    }

    #[test]
    fn test_local_rule_splits_every_occurrence() {
        let grammar = rule(RuleSpec::new(r"\d+"));
        let source = "a1 b22 c";
        let mut state = MatchState::new(source);
        let outcome = state.apply("t", first_rule(&grammar));

        assert_eq!(outcome.matches, 2);
        assert!(!outcome.reopened);
        assert_eq!(render(source, &state.into_spans()), "a[1] b[22] c");
    }

    #[test]
    fn test_local_rule_anchors_to_region_edges() {
        let grammar = rule(RuleSpec::new(r"^x"));
        let source = "xax";
        let mut state = MatchState::new(source);
        state.apply("t", first_rule(&grammar));

        // The remainder "ax" is a fresh region, and it does not start with x
        assert_eq!(render(source, &state.into_spans()), "[x]ax");
    }

    #[test]
    fn test_tokens_are_opaque_to_local_rules() {
        let grammar = Grammar::builder()
            .pattern("word", r"ab")
            .pattern("letter", r"[a-z]")
            .build()
            .unwrap();
        let source = "abc";
        let mut state = MatchState::new(source);
        for entry in grammar.entries() {
            state.apply(entry.name(), &entry.rules()[0]);
        }
        assert_eq!(render(source, &state.into_spans()), "[ab][c]");
    }

    #[test]
    fn test_zero_length_match_is_no_match() {
        let grammar = rule(RuleSpec::new(r"x*"));
        let source = "abc";
        let mut state = MatchState::new(source);
        let outcome = state.apply("t", first_rule(&grammar));

        assert_eq!(outcome.matches, 0);
        assert_eq!(render(source, &state.into_spans()), "abc");
    }

    #[test]
    fn test_greedy_zero_length_match_is_no_match() {
        let grammar = rule(RuleSpec::new(r"x*").greedy());
        let source = "abc";
        let mut state = MatchState::new(source);
        let outcome = state.apply("t", first_rule(&grammar));

        assert_eq!(outcome.matches, 0);
        assert_eq!(render(source, &state.into_spans()), "abc");
    }

    /// Apply `spec` once, plain and greedy, and render both results.
    fn apply_both(spec: RuleSpec, source: &str) -> (String, String) {
        let local = rule(spec.clone());
        let greedy = rule(spec.greedy());

        let mut state = MatchState::new(source);
        state.apply("t", first_rule(&local));
        let local = render(source, &state.into_spans());

        let mut state = MatchState::new(source);
        state.apply("t", first_rule(&greedy));
        (local, render(source, &state.into_spans()))
    }

    #[test]
    fn test_search_continues_past_empty_match() {
        let (local, greedy) = apply_both(RuleSpec::new(r"\d*"), "ab12");
        assert_eq!(local, "ab[12]");
        assert_eq!(greedy, "ab[12]");

        let (local, greedy) = apply_both(RuleSpec::new(r"\d*"), "1a2é3");
        assert_eq!(local, "[1]a[2]é[3]");
        assert_eq!(greedy, "[1]a[2]é[3]");
    }

    #[test]
    fn test_search_continues_past_empty_capture() {
        let (local, greedy) = apply_both(RuleSpec::new(r"(b*)c").capture(), "c bc");
        assert_eq!(local, "c [b]c");
        assert_eq!(greedy, "c [b]c");
    }

    #[test]
    fn test_capture_keeps_context_unmatched() {
        let grammar = rule(RuleSpec::new(r"(\w+)\s*=").capture());
        let source = "key = value";
        let mut state = MatchState::new(source);
        state.apply("t", first_rule(&grammar));

        assert_eq!(render(source, &state.into_spans()), "[key] = value");
    }

    #[test]
    fn test_capture_prefix_context() {
        let grammar = rule(RuleSpec::new(r"@(\w+)").capture());
        let source = "x @name y";
        let mut state = MatchState::new(source);
        state.apply("t", first_rule(&grammar));

        assert_eq!(render(source, &state.into_spans()), "x @[name] y");
    }

    #[test]
    fn test_greedy_sees_surrounding_context() {
        // Non-greedy would see "b" as its own region and \b would hold at its start
        let grammar = Grammar::builder()
            .pattern("a", "a")
            .rule("word", RuleSpec::new(r"\bb").greedy())
            .build()
            .unwrap();
        let source = "ab";
        let mut state = MatchState::new(source);
        for entry in grammar.entries() {
            state.apply(entry.name(), &entry.rules()[0]);
        }
        assert_eq!(render(source, &state.into_spans()), "[a]b");
    }

    #[test]
    fn test_greedy_absorbs_earlier_tokens() {
        let grammar = Grammar::builder()
            .pattern("keyword", r"\bmap\b")
            .rule("string", RuleSpec::new(r#""[^"]*""#).greedy())
            .build()
            .unwrap();
        let source = r#"x "map it" y"#;
        let mut state = MatchState::new(source);

        let keyword = state.apply("keyword", &grammar.entries()[0].rules()[0]);
        assert_eq!(keyword.matches, 1);

        let string = state.apply("string", &grammar.entries()[1].rules()[0]);
        assert_eq!(string.matches, 1);
        assert!(string.reopened);
        assert_eq!(render(source, &state.into_spans()), r#"x ["map it"] y"#);
    }

    #[test]
    fn test_greedy_reopens_partially_covered_token() {
        let grammar = Grammar::builder()
            .pattern("word", r"cde")
            .rule("run", RuleSpec::new(r"abcd").greedy())
            .build()
            .unwrap();
        let source = "abcdef";
        let mut state = MatchState::new(source);
        state.apply("word", &grammar.entries()[0].rules()[0]);
        let outcome = state.apply("run", &grammar.entries()[1].rules()[0]);

        assert!(outcome.reopened);
        let spans = state.into_spans();
        assert_eq!(render(source, &spans), "[abcd]ef");
        assert!(spans[1].is_unmatched());
    }

    #[test]
    fn test_greedy_skips_match_starting_inside_token() {
        let grammar = Grammar::builder()
            .pattern("word", r"ab")
            .rule("pair", RuleSpec::new(r"b c|c").greedy())
            .build()
            .unwrap();
        let source = "xab c";
        let mut state = MatchState::new(source);
        state.apply("word", &grammar.entries()[0].rules()[0]);
        let outcome = state.apply("pair", &grammar.entries()[1].rules()[0]);

        // "b c" starts inside [ab]; the search resumes after it and finds "c"
        assert!(!outcome.reopened);
        assert_eq!(outcome.matches, 1);
        assert_eq!(render(source, &state.into_spans()), "x[ab] [c]");
    }

    #[test]
    fn test_empty_source_keeps_single_empty_span() {
        let grammar = rule(RuleSpec::new(r"x"));
        let mut state = MatchState::new("");
        state.apply("t", first_rule(&grammar));
        let spans = state.into_spans();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].is_unmatched());
    }
}
