//! Classification of canonical SQL statements into query plans.

use crate::error::Error;
use crate::plan::{
    AggregateCall, AggregateFunction, AggregatePlan, DeletePlan, DescribePlan, QueryPlan,
    SearchPlan, ShowPlan, SortOrder,
};

/// Clauses we have no backend translation for.
const UNSUPPORTED_CLAUSES: [&str; 5] = ["JOIN", "UNION", "MINUS", "EXCEPT", "INTERSECT"];

/// Compile a canonical SQL statement into a query plan.
pub fn compile(sql: &str) -> Result<QueryPlan, Error> {
    let statement = sql.trim().trim_end_matches(';').trim();
    if statement.is_empty() {
        return Err(Error::ParseFailure("<empty statement>".to_string()));
    }

    for clause in UNSUPPORTED_CLAUSES {
        if keyword_position(statement, clause).is_some() {
            return Err(Error::UnsupportedFeature(format!("{clause} clauses")));
        }
    }

    let head = first_word(statement);
    let plan = match head.to_ascii_uppercase().as_str() {
        "SELECT" => compile_select(statement)?,
        "DELETE" => compile_delete(statement)?,
        "SHOW" => compile_show(statement)?,
        "DESCRIBE" | "DESC" => compile_describe(statement, head)?,
        "INSERT" | "UPDATE" | "CREATE" | "DROP" | "ALTER" => {
            return Err(Error::UnsupportedFeature(format!(
                "{} statements",
                head.to_ascii_uppercase()
            )))
        }
        other => return Err(Error::ParseFailure(other.to_string())),
    };

    tracing::debug!(plan = plan.kind(), "compiled statement");
    Ok(plan)
}

fn compile_select(statement: &str) -> Result<QueryPlan, Error> {
    // a second SELECT can only come from a sub-select
    if keyword_position(&statement[6..], "SELECT").is_some() {
        return Err(Error::UnsupportedFeature("subqueries".to_string()));
    }

    let (from_start, from_end) = keyword_position(statement, "FROM")
        .ok_or_else(|| Error::ParseFailure(clip(statement)))?;
    let projection = statement[6..from_start].trim();
    if projection.is_empty() {
        return Err(Error::ParseFailure(clip(statement)));
    }

    let rest = statement[from_end..].trim();
    let index = first_word(rest);
    if index.is_empty() {
        return Err(Error::ParseFailure(clip(statement)));
    }
    let tail = rest[index.len()..].trim();

    let clauses = split_clauses(tail)?;
    let group_by = match &clauses.group_by {
        Some(columns) => comma_separated(columns),
        None => vec![],
    };

    let items = projection_items(projection);
    let mut metrics = vec![];
    let mut plain = vec![];
    for item in &items {
        match parse_aggregate(item) {
            Some(call) => metrics.push(call?),
            None => plain.push(item.to_string()),
        }
    }

    if metrics.is_empty() && group_by.is_empty() {
        let fields = if projection == "*" { vec![] } else { plain };
        return Ok(QueryPlan::Search(SearchPlan {
            sql: statement.to_string(),
            index: index.to_string(),
            fields,
            filter: clauses.filter,
            sort: clauses.sort,
            limit: clauses.limit,
        }));
    }

    // every non-aggregate projection item must be grouped on
    for column in &plain {
        if !group_by.contains(column) {
            return Err(Error::ParseFailure(column.clone()));
        }
    }

    Ok(QueryPlan::Aggregate(AggregatePlan {
        sql: statement.to_string(),
        index: index.to_string(),
        group_by,
        metrics,
        filter: clauses.filter,
    }))
}

fn compile_delete(statement: &str) -> Result<QueryPlan, Error> {
    let (_, from_end) = keyword_position(statement, "FROM")
        .ok_or_else(|| Error::ParseFailure(clip(statement)))?;
    let rest = statement[from_end..].trim();
    let index = first_word(rest);
    if index.is_empty() {
        return Err(Error::ParseFailure(clip(statement)));
    }
    let tail = rest[index.len()..].trim();

    let filter = match keyword_position(tail, "WHERE") {
        Some((_, where_end)) => {
            let condition = tail[where_end..].trim();
            if condition.is_empty() {
                return Err(Error::ParseFailure(clip(statement)));
            }
            Some(condition.to_string())
        }
        None if tail.is_empty() => None,
        None => return Err(Error::ParseFailure(tail.to_string())),
    };

    Ok(QueryPlan::Delete(DeletePlan {
        sql: statement.to_string(),
        index: index.to_string(),
        filter,
    }))
}

fn compile_show(statement: &str) -> Result<QueryPlan, Error> {
    let tail = statement[4..].trim();
    let subject = first_word(tail);
    if !subject.eq_ignore_ascii_case("TABLES") {
        return Err(Error::ParseFailure(subject.to_string()));
    }
    let tail = tail[subject.len()..].trim();

    let pattern = if tail.is_empty() {
        "*".to_string()
    } else {
        let like = first_word(tail);
        if !like.eq_ignore_ascii_case("LIKE") {
            return Err(Error::ParseFailure(like.to_string()));
        }
        let pattern = tail[like.len()..].trim();
        if pattern.is_empty() {
            return Err(Error::ParseFailure(clip(statement)));
        }
        unquote(pattern).replace('%', "*")
    };

    Ok(QueryPlan::Show(ShowPlan {
        sql: statement.to_string(),
        pattern,
    }))
}

fn compile_describe(statement: &str, head: &str) -> Result<QueryPlan, Error> {
    let tail = statement[head.len()..].trim();
    let index = first_word(tail);
    if index.is_empty() || !tail[index.len()..].trim().is_empty() {
        return Err(Error::ParseFailure(clip(statement)));
    }
    Ok(QueryPlan::Describe(DescribePlan {
        sql: statement.to_string(),
        index: unquote(index),
    }))
}

/// The optional clauses following the index name of a SELECT.
struct SelectClauses {
    filter: Option<String>,
    group_by: Option<String>,
    sort: Vec<(String, SortOrder)>,
    limit: Option<u64>,
}

fn split_clauses(tail: &str) -> Result<SelectClauses, Error> {
    let where_pos = keyword_position(tail, "WHERE");
    let group_pos = keyword_position(tail, "GROUP");
    let order_pos = keyword_position(tail, "ORDER");
    let limit_pos = keyword_position(tail, "LIMIT");

    // clause order is fixed: WHERE, GROUP BY, ORDER BY, LIMIT
    let end_of = |start: usize| {
        [group_pos, order_pos, limit_pos]
            .into_iter()
            .flatten()
            .map(|(clause_start, _)| clause_start)
            .filter(|clause_start| *clause_start > start)
            .min()
            .unwrap_or(tail.len())
    };

    let filter = match where_pos {
        Some((start, end)) => {
            let condition = tail[end..end_of(start)].trim();
            if condition.is_empty() {
                return Err(Error::ParseFailure(clip(tail)));
            }
            Some(condition.to_string())
        }
        None => None,
    };

    let group_by = match group_pos {
        Some((start, end)) => {
            let clause = tail[end..end_of(start)].trim();
            let by = first_word(clause);
            if !by.eq_ignore_ascii_case("BY") {
                return Err(Error::ParseFailure(clip(clause)));
            }
            let columns = clause[by.len()..].trim();
            if columns.is_empty() {
                return Err(Error::ParseFailure(clip(tail)));
            }
            Some(columns.to_string())
        }
        None => None,
    };

    let sort = match order_pos {
        Some((start, end)) => {
            let clause = tail[end..end_of(start)].trim();
            let by = first_word(clause);
            if !by.eq_ignore_ascii_case("BY") {
                return Err(Error::ParseFailure(clip(clause)));
            }
            parse_sort(clause[by.len()..].trim())?
        }
        None => vec![],
    };

    let limit = match limit_pos {
        Some((start, end)) => {
            let literal = tail[end..end_of(start)].trim();
            let parsed = literal
                .parse::<u64>()
                .map_err(|_| Error::ParseFailure(literal.to_string()))?;
            Some(parsed)
        }
        None => None,
    };

    Ok(SelectClauses {
        filter,
        group_by,
        sort,
        limit,
    })
}

fn parse_sort(clause: &str) -> Result<Vec<(String, SortOrder)>, Error> {
    comma_separated(clause)
        .iter()
        .map(|element| {
            let mut words = element.split_whitespace();
            let field = words
                .next()
                .ok_or_else(|| Error::ParseFailure(clip(clause)))?;
            let order = match words.next() {
                None => SortOrder::Asc,
                Some(word) if word.eq_ignore_ascii_case("ASC") => SortOrder::Asc,
                Some(word) if word.eq_ignore_ascii_case("DESC") => SortOrder::Desc,
                Some(word) => return Err(Error::ParseFailure(word.to_string())),
            };
            Ok((field.to_string(), order))
        })
        .collect()
}

/// Parse one projection item as an aggregate call, if it is one.
fn parse_aggregate(item: &str) -> Option<Result<AggregateCall, Error>> {
    let open = item.find('(')?;
    let name = item[..open].trim().to_ascii_uppercase();
    let function = match name.as_str() {
        "COUNT" => AggregateFunction::Count,
        "SUM" => AggregateFunction::Sum,
        "AVG" => AggregateFunction::Avg,
        "MIN" => AggregateFunction::Min,
        "MAX" => AggregateFunction::Max,
        _ => return Some(Err(Error::UnsupportedFeature(format!("{name} calls")))),
    };
    let close = match item.rfind(')') {
        Some(close) if close > open => close,
        _ => return Some(Err(Error::ParseFailure(item.to_string()))),
    };
    let field = item[open + 1..close].trim();
    if field.is_empty() {
        return Some(Err(Error::ParseFailure(item.to_string())));
    }
    if field == "*" && function != AggregateFunction::Count {
        return Some(Err(Error::ParseFailure(item.to_string())));
    }
    Some(Ok(AggregateCall {
        function,
        field: field.to_string(),
    }))
}

/// Split a projection list on top-level commas.
fn projection_items(projection: &str) -> Vec<String> {
    let mut items = vec![];
    let mut depth = 0usize;
    let mut current = String::new();
    for c in projection.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                items.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        items.push(current.trim().to_string());
    }
    items
}

fn comma_separated(text: &str) -> Vec<String> {
    text.split(',')
        .map(|piece| piece.trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Locate the first standalone, case-insensitive occurrence of a keyword.
/// Returns the byte range of the occurrence.
fn keyword_position(text: &str, keyword: &str) -> Option<(usize, usize)> {
    let haystack = text.to_ascii_uppercase();
    let needle = keyword.to_ascii_uppercase();
    let mut search_from = 0;
    while let Some(offset) = haystack[search_from..].find(&needle) {
        let start = search_from + offset;
        let end = start + needle.len();
        let bounded_left = start == 0 || !is_word_char(haystack.as_bytes()[start - 1]);
        let bounded_right = end == haystack.len() || !is_word_char(haystack.as_bytes()[end]);
        if bounded_left && bounded_right {
            return Some((start, end));
        }
        search_from = start + 1;
    }
    None
}

fn is_word_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

fn unquote(text: &str) -> String {
    text.trim_matches(|c| c == '\'' || c == '"' || c == '`')
        .to_string()
}

/// Shorten a statement fragment for an error message.
fn clip(text: &str) -> String {
    const LIMIT: usize = 40;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(LIMIT).collect();
        format!("{prefix}...")
    }
}
