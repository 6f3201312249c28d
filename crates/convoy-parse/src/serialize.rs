use serde::Serialize;

use convoy_core::{ChangeRequest, ChangeType};

use crate::error::{FormatError, ValidationError};
use crate::parse::FRONT_MATTER_DELIMITER;

#[derive(Serialize)]
struct FrontMatterOutput<'a> {
    package: &'a str,
    change: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'a str>,
}

#[must_use = "serialization result should be handled"]
pub fn serialize_change_request(request: &ChangeRequest) -> Result<String, FormatError> {
    if request.package.trim().is_empty() {
        return Err(ValidationError::EmptyPackageName.into());
    }

    let front_matter = FrontMatterOutput {
        package: &request.package,
        change: request.change,
        author: request.author.as_deref(),
        commit: request.commit.as_deref(),
    };

    let yaml = serde_yml::to_string(&front_matter)?;

    let mut output = String::new();
    output.push_str(FRONT_MATTER_DELIMITER);
    output.push('\n');
    output.push_str(&yaml);
    output.push_str(FRONT_MATTER_DELIMITER);
    output.push('\n');

    if !request.comment.is_empty() {
        output.push_str(&request.comment);
        output.push('\n');
    }

    Ok(output)
}
