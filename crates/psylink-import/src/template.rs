use crate::error::ImportError;
use crate::fields::LinkField;
use crate::reader::UTF8_BOM;

pub const TEMPLATE_FILE_NAME: &str = "链接导入模板.csv";

/// A fill-in CSV for batch link import: the canonical header row plus one
/// sample row. Starts with a BOM so spreadsheet programs detect UTF-8.
pub fn generate_template() -> Result<Vec<u8>, ImportError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(LinkField::ALL.iter().map(|field| field.template_header()))?;

    let created_at = jiff::Timestamp::now().to_string();
    let sample = LinkField::ALL.map(|field| match field {
        LinkField::QuestionnaireType => "SCL-90",
        LinkField::Status => "unused",
        LinkField::CreatedAt => created_at.as_str(),
        _ => "",
    });
    writer.write_record(sample)?;

    writer
        .into_inner()
        .map_err(|e| ImportError::Csv(e.to_string()))
}
