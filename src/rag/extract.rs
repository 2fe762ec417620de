//! Recovers `(sql_query, result, justification)` from the reasoning loop's
//! free-form output. A partially structured response is expected, not
//! exceptional: every extraction is an ordered list of rules, a rule that
//! finds nothing falls through to the next, and the end of each list is a
//! fixed sentinel string. Nothing here ever fails.

const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const RESPOSTA_MARKER: &str = "### Resposta:";
const JUSTIFICATIVA_MARKER: &str = "### Justificativa:";
const THOUGHT_PREFIX: &str = "Thought:";
const ACTION_MARKER: &str = "Action:";

pub const SQL_NOT_FOUND: &str = "Consulta não encontrada na resposta";
pub const RESULT_NOT_FOUND: &str = "Resultado não encontrado na resposta";

/// Label that opens a justification rebuilt from the thought trace.
const THOUGHT_TRACE_INTRO: &str = "Raciocínio do agente:";
/// Fallback when the agent ran tools but recorded no reasoning.
const TOOL_PASS_LABEL: &str = "Consulta executada via ferramentas, sem raciocínio registrado";
/// Fallback when the output carries neither reasoning nor tool calls.
const ANALYSIS_LABEL: &str = "Análise em andamento";

/// Structured fields recovered from one raw agent output.
/// All three fields are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub sql_query: String,
    pub result: String,
    pub justification: String,
}

/// Run the three extractions independently over the same immutable text.
pub fn extract(output: &str) -> Extraction {
    Extraction {
        sql_query: extract_sql(output).unwrap_or_else(|| SQL_NOT_FOUND.to_string()),
        result: extract_result(output).unwrap_or_else(|| RESULT_NOT_FOUND.to_string()),
        justification: extract_justification(output),
    }
}

/// `Some` only for non-blank content; a blank hit counts as a rule miss.
fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// SQL: fenced ```sql block first, bare SELECT line second.
fn extract_sql(output: &str) -> Option<String> {
    fenced_sql(output).or_else(|| select_line(output))
}

fn fenced_sql(output: &str) -> Option<String> {
    let start = output.find("```sql")? + "```sql".len();
    let rest = &output[start..];
    let end = rest.find("```").unwrap_or(rest.len());
    non_empty(&rest[..end])
}

/// First line containing SELECT (case-insensitive) with enough trimmed
/// length to be a plausible query rather than a stray mention.
fn select_line(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| {
            let trimmed = line.trim();
            trimmed.len() > 10 && trimmed.to_lowercase().contains("select")
        })
        .map(|line| line.to_string())
}

/// Result: the Final Answer tail, then the Resposta section, then trailing
/// lines, then trailing characters.
fn extract_result(output: &str) -> Option<String> {
    final_answer_tail(output)
        .or_else(|| resposta_section(output))
        .or_else(|| trailing_lines(output))
        .or_else(|| trailing_chars(output))
}

fn final_answer_tail(output: &str) -> Option<String> {
    let start = output.find(FINAL_ANSWER_MARKER)? + FINAL_ANSWER_MARKER.len();
    let tail = &output[start..];
    // Agents sometimes echo the grammar skeleton or a stale earlier answer;
    // the real content is whatever follows the last separator.
    let tail = match tail.rfind("---") {
        Some(sep) => &tail[sep + "---".len()..],
        None => tail,
    };
    non_empty(tail)
}

fn resposta_section(output: &str) -> Option<String> {
    let start = output.find(RESPOSTA_MARKER)? + RESPOSTA_MARKER.len();
    let tail = &output[start..];
    let end = tail.find("###").unwrap_or(tail.len());
    non_empty(&tail[..end])
}

/// Up to the last 5 non-empty lines that are not thought lines, in
/// original order.
fn trailing_lines(output: &str) -> Option<String> {
    let lines: Vec<&str> = output
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with(THOUGHT_PREFIX)
        })
        .collect();
    if lines.is_empty() {
        return None;
    }
    let start = lines.len().saturating_sub(5);
    Some(lines[start..].join("\n"))
}

fn trailing_chars(output: &str) -> Option<String> {
    let trimmed = output.trim();
    let start = trimmed
        .char_indices()
        .rev()
        .nth(499)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    non_empty(&trimmed[start..])
}

/// Justification: the explicit Justificativa section when the agent wrote
/// one, otherwise the collected thought trace, otherwise a fixed label.
fn extract_justification(output: &str) -> String {
    if let Some(section) = justificativa_section(output) {
        return section;
    }
    if let Some(trace) = thought_trace(output) {
        return trace;
    }
    if output.contains(ACTION_MARKER) {
        TOOL_PASS_LABEL.to_string()
    } else {
        ANALYSIS_LABEL.to_string()
    }
}

fn justificativa_section(output: &str) -> Option<String> {
    let start = output.find(JUSTIFICATIVA_MARKER)? + JUSTIFICATIVA_MARKER.len();
    let tail = &output[start..];
    let end = tail.find("---").unwrap_or(tail.len());
    non_empty(&tail[..end])
}

/// Every line that, once trimmed, starts with `Thought:`, prefix stripped
/// and joined in original order under a fixed label.
fn thought_trace(output: &str) -> Option<String> {
    let thoughts: Vec<&str> = output
        .lines()
        .filter_map(|line| line.trim().strip_prefix(THOUGHT_PREFIX))
        .map(str::trim)
        .filter(|thought| !thought.is_empty())
        .collect();
    if thoughts.is_empty() {
        return None;
    }
    Some(format!("{}\n{}", THOUGHT_TRACE_INTRO, thoughts.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ANSWER: &str = "Thought: preciso somar as horas\nAction: sql_db_query\nAction Input: SELECT 1\nObservation: 1\nThought: posso responder\nFinal Answer:\n\n### Consulta:\n```sql\nSELECT 1\n```\n\n### Resposta:\n1\n\n### Justificativa:\nbecause\n---";

    #[test]
    fn test_full_answer_extraction() {
        let fields = extract(FULL_ANSWER);
        assert_eq!(fields.sql_query, "SELECT 1");
        assert_eq!(fields.result, "1");
        assert!(fields.justification.contains("because"));
    }

    #[test]
    fn test_fenced_sql_pretty_print_preserved() {
        let output = "### Consulta:\n```sql\nSELECT Chassi,\n       SUM(Valor) AS TotalHoras\nFROM Telemetria\nGROUP BY Chassi\n```\n";
        let fields = extract(output);
        assert_eq!(
            fields.sql_query,
            "SELECT Chassi,\n       SUM(Valor) AS TotalHoras\nFROM Telemetria\nGROUP BY Chassi"
        );
    }

    #[test]
    fn test_unfenced_select_line() {
        let output = "the query was\nSELECT Categoria FROM Telemetria\ndone";
        assert_eq!(extract(output).sql_query, "SELECT Categoria FROM Telemetria");
    }

    #[test]
    fn test_short_select_line_not_mistaken_for_query() {
        // a bare "SELECT 1" outside a fence is too short to be trusted
        assert_eq!(extract("ok\nSELECT 1\nok").sql_query, SQL_NOT_FOUND);
    }

    #[test]
    fn test_sql_sentinel_when_absent() {
        assert_eq!(extract("no queries here").sql_query, SQL_NOT_FOUND);
    }

    #[test]
    fn test_final_answer_without_separator_takes_tail() {
        let output = "Thought: done\nFinal Answer: a soma é 42 horas";
        assert_eq!(extract(output).result, "a soma é 42 horas");
    }

    #[test]
    fn test_final_answer_keeps_text_after_last_separator() {
        let output = "Final Answer:\n\n---\n\nstale draft\n\n---\n\na resposta definitiva";
        assert_eq!(extract(output).result, "a resposta definitiva");
    }

    #[test]
    fn test_resposta_section_bounded_by_next_heading() {
        let output = "### Resposta:\n| Chassi | Horas |\n|---|---|\n| 1 | 42 |\n\n### Justificativa:\nsoma por chassi";
        let fields = extract(output);
        assert_eq!(fields.result, "| Chassi | Horas |\n|---|---|\n| 1 | 42 |");
    }

    #[test]
    fn test_markerless_output_falls_back_to_trailing_lines() {
        let output = "Thought: ainda pensando\nprimeira linha\n\nsegunda linha\nterceira linha";
        let fields = extract(output);
        assert_eq!(fields.result, "primeira linha\nsegunda linha\nterceira linha");
    }

    #[test]
    fn test_trailing_lines_keep_at_most_five() {
        let output = "l1\nl2\nl3\nl4\nl5\nl6\nl7";
        assert_eq!(extract(output).result, "l3\nl4\nl5\nl6\nl7");
    }

    #[test]
    fn test_thought_only_output_falls_back_to_trailing_chars() {
        let output = "Thought: só raciocínio, nenhuma outra linha";
        let fields = extract(output);
        // every line is a thought line, so the raw tail is used
        assert_eq!(fields.result, output);
    }

    #[test]
    fn test_empty_output_yields_sentinels() {
        let fields = extract("");
        assert_eq!(fields.sql_query, SQL_NOT_FOUND);
        assert_eq!(fields.result, RESULT_NOT_FOUND);
        assert_eq!(fields.justification, ANALYSIS_LABEL);
    }

    #[test]
    fn test_thought_trace_order_and_prefix_stripping() {
        let output = "Thought: step one\nsome noise\n  Thought: step two";
        let justification = extract(output).justification;
        assert!(justification.starts_with(THOUGHT_TRACE_INTRO));
        let one = justification.find("step one").unwrap();
        let two = justification.find("step two").unwrap();
        assert!(one < two);
        assert!(!justification.contains(THOUGHT_PREFIX));
    }

    #[test]
    fn test_justificativa_section_preferred_over_trace() {
        let output = "Thought: raciocínio\n### Justificativa:\nexplicação final\n---";
        assert_eq!(extract(output).justification, "explicação final");
    }

    #[test]
    fn test_tool_pass_label_when_action_without_thought() {
        let output = "Action: sql_db_query\nAction Input: SELECT * FROM Chassis LIMIT 5";
        assert_eq!(extract(output).justification, TOOL_PASS_LABEL);
    }

    #[test]
    fn test_analysis_label_when_nothing_recorded() {
        assert_eq!(extract("texto solto").justification, ANALYSIS_LABEL);
    }

    #[test]
    fn test_extractions_are_independent() {
        // result missing its markers must not stop sql or justification
        let output = "Thought: vou consultar\n```sql\nSELECT COUNT(*) FROM Telemetria\n```";
        let fields = extract(output);
        assert_eq!(fields.sql_query, "SELECT COUNT(*) FROM Telemetria");
        assert!(!fields.result.is_empty());
        assert!(fields.justification.contains("vou consultar"));
    }
}
