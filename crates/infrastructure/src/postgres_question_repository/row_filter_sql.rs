use forum_core::{AppError, AppResult};
use forum_domain::{FieldValue, Question, RowFilter};
use sqlx::{Postgres, QueryBuilder};

/// Maps a declared question field onto its column.
fn column(field: &str) -> AppResult<&'static str> {
    match field {
        Question::TITLE => Ok("title"),
        Question::BODY => Ok("body"),
        Question::CREATOR => Ok("creator_id"),
        Question::IS_PUBLISHED => Ok("is_published"),
        other => Err(AppError::Validation(format!(
            "question field '{other}' has no column"
        ))),
    }
}

/// Appends `filter` as a boolean SQL expression with bound parameters.
pub(super) fn push_row_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &RowFilter,
) -> AppResult<()> {
    match filter {
        RowFilter::Everything => {
            builder.push("TRUE");
        }
        RowFilter::Nothing => {
            builder.push("FALSE");
        }
        RowFilter::Equals { field, value } => {
            builder.push(column(field)?);
            builder.push(" = ");
            match value {
                FieldValue::Bool(value) => builder.push_bind(*value),
                FieldValue::User(user_id) => builder.push_bind(user_id.as_uuid()),
                FieldValue::Text(value) => builder.push_bind(value.clone()),
            };
        }
        RowFilter::AnyOf(filters) => push_group(builder, filters, " OR ", "FALSE")?,
        RowFilter::AllOf(filters) => push_group(builder, filters, " AND ", "TRUE")?,
    }

    Ok(())
}

fn push_group(
    builder: &mut QueryBuilder<'_, Postgres>,
    filters: &[RowFilter],
    separator: &'static str,
    empty: &'static str,
) -> AppResult<()> {
    if filters.is_empty() {
        builder.push(empty);
        return Ok(());
    }

    builder.push("(");
    for (index, filter) in filters.iter().enumerate() {
        if index > 0 {
            builder.push(separator);
        }
        push_row_filter(builder, filter)?;
    }
    builder.push(")");

    Ok(())
}
