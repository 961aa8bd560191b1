//! Terminal rendering for serplens analysis results

use std::fmt::Write as FmtWrite;

use serplens_core::{AnalysisResult, Benchmark, KeywordFrequency, PageReport};

pub const APP_NAME: &str = "serplens";

const DIVIDER: &str = "─────────────────────────────────────────────────────────────";
const LABEL_WIDTH: usize = 16;
const TERM_WIDTH: usize = 20;

/// Number of keyword rows shown in the comparison table.
pub const KEYWORD_ROWS: usize = 10;

pub fn push_section_header(buf: &mut String, icon: &str, title: &str) {
    let _ = writeln!(buf, "{DIVIDER}");
    let _ = writeln!(buf, "{icon} {title}");
    let _ = writeln!(buf, "{DIVIDER}");
}

pub fn push_key_value(buf: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(buf, "• {:<width$} : {}", label, value, width = LABEL_WIDTH);
}

/// Human readable report for one analysis.
pub fn render_summary(keyword: &str, result: &AnalysisResult) -> String {
    let mut output = String::new();

    render_page(&mut output, keyword, &result.user_analysis);
    render_benchmark(&mut output, &result.competitor_benchmarks);
    render_keyword_table(
        &mut output,
        &result.user_analysis.top_keywords,
        &result.competitor_benchmarks.common_keywords,
    );
    render_verdict(&mut output, &result.user_analysis, &result.competitor_benchmarks);

    output
}

fn render_page(buf: &mut String, keyword: &str, page: &PageReport) {
    push_section_header(buf, "🔎", &format!("Your Page for \"{keyword}\""));
    push_key_value(buf, "URL", &page.url);
    push_key_value(buf, "HTTP Status", &page.http_status.to_string());
    push_key_value(buf, "Title", &page.title);
    push_key_value(buf, "Description", &page.meta_description);
    push_key_value(buf, "Word Count", &page.word_count.to_string());
    let _ = writeln!(buf);
}

fn render_benchmark(buf: &mut String, benchmark: &Benchmark) {
    push_section_header(buf, "📊", "Competitor Benchmark");
    push_key_value(buf, "Competitors", &benchmark.competitor_count.to_string());
    push_key_value(
        buf,
        "Avg Word Count",
        &benchmark.average_word_count.to_string(),
    );
    let _ = writeln!(buf);
}

fn render_keyword_table(buf: &mut String, ours: &KeywordFrequency, theirs: &KeywordFrequency) {
    push_section_header(buf, "🔑", "Keywords");

    if theirs.is_empty() {
        let _ = writeln!(buf, "No competitor keywords.\n");
        return;
    }

    let _ = writeln!(
        buf,
        "| {:<width$} | Competitors | Your Page |",
        "Keyword",
        width = TERM_WIDTH
    );
    let _ = writeln!(buf, "|{:-<w$}|-------------|-----------|", "", w = TERM_WIDTH + 2);

    for (term, count) in theirs.iter().take(KEYWORD_ROWS) {
        let own = ours
            .get(term)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "–".to_string());
        let _ = writeln!(
            buf,
            "| {:<width$} | {:>11} | {:>9} |",
            term,
            count,
            own,
            width = TERM_WIDTH
        );
    }
    let _ = writeln!(buf);
}

fn render_verdict(buf: &mut String, page: &PageReport, benchmark: &Benchmark) {
    let missing = missing_keywords(&page.top_keywords, &benchmark.common_keywords);

    push_section_header(buf, "💡", "Gaps");
    push_key_value(buf, "Length", &length_gap(page.word_count, benchmark.average_word_count));
    if missing.is_empty() {
        push_key_value(buf, "Keywords", "all common competitor keywords present");
    } else {
        push_key_value(buf, "Missing", &missing.join(", "));
    }
}

/// Common competitor keywords, in ranking order, absent from the page's own top keywords.
pub fn missing_keywords<'a>(ours: &KeywordFrequency, theirs: &'a KeywordFrequency) -> Vec<&'a str> {
    theirs
        .terms()
        .take(KEYWORD_ROWS)
        .filter(|term| ours.get(term).is_none())
        .collect()
}

/// One-line comparison of the page length against the competitor average.
pub fn length_gap(word_count: usize, average: usize) -> String {
    match word_count.cmp(&average) {
        std::cmp::Ordering::Less => format!(
            "{} words shorter than the average competitor",
            average - word_count
        ),
        std::cmp::Ordering::Greater => format!(
            "{} words longer than the average competitor",
            word_count - average
        ),
        std::cmp::Ordering::Equal => "same length as the average competitor".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(words: usize, keywords: &[&str]) -> PageReport {
        PageReport {
            url: "https://example.com/shoes".to_string(),
            http_status: 200,
            title: "Our Shoes".to_string(),
            meta_description: "Not Found".to_string(),
            word_count: words,
            top_keywords: KeywordFrequency::from_terms(keywords.iter().copied()),
        }
    }

    fn benchmark(average: usize, keywords: &[&str]) -> Benchmark {
        Benchmark {
            average_word_count: average,
            common_keywords: KeywordFrequency::from_terms(keywords.iter().copied()),
            competitor_count: 4,
        }
    }

    #[test]
    fn test_length_gap() {
        assert_eq!(
            length_gap(300, 1200),
            "900 words shorter than the average competitor"
        );
        assert_eq!(
            length_gap(1500, 1200),
            "300 words longer than the average competitor"
        );
        assert_eq!(length_gap(0, 0), "same length as the average competitor");
    }

    #[test]
    fn test_missing_keywords_keeps_competitor_order() {
        let ours = KeywordFrequency::from_terms(["shoes", "running"]);
        let theirs = KeywordFrequency::from_terms([
            "running", "running", "shoes", "shoes", "cushion", "cushion", "trail",
        ]);

        assert_eq!(missing_keywords(&ours, &theirs), vec!["cushion", "trail"]);
    }

    #[test]
    fn test_push_key_value_skips_empty() {
        let mut buf = String::new();
        push_key_value(&mut buf, "Title", "");
        assert!(buf.is_empty());

        push_key_value(&mut buf, "Title", "Shoes");
        assert_eq!(buf, format!("• {:<16} : Shoes\n", "Title"));
    }

    #[test]
    fn test_render_summary_sections() {
        let result = AnalysisResult {
            user_analysis: page(420, &["shoes", "running", "shoes"]),
            competitor_benchmarks: benchmark(1200, &["running", "running", "cushion"]),
        };

        let summary = render_summary("running shoes", &result);

        assert!(summary.contains("Your Page for \"running shoes\""));
        assert!(summary.contains("Our Shoes"));
        assert!(summary.contains("Competitor Benchmark"));
        assert!(summary.contains("1200"));
        assert!(summary.contains("| running"));
        assert!(summary.contains("780 words shorter"));
        assert!(summary.contains("cushion"));
        // "Not Found" is still a value and is shown as-is
        assert!(summary.contains("Not Found"));
    }

    #[test]
    fn test_render_summary_without_competitor_keywords() {
        let result = AnalysisResult {
            user_analysis: page(10, &["shoes"]),
            competitor_benchmarks: benchmark(10, &[]),
        };

        let summary = render_summary("shoes", &result);
        assert!(summary.contains("No competitor keywords."));
        assert!(summary.contains("all common competitor keywords present"));
    }
}
