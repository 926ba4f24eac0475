mod common;

use psylink_import::ImportFile;
use psylink_import::template::{TEMPLATE_FILE_NAME, generate_template};

#[test]
fn template_starts_with_bom_and_canonical_headers() {
    let bytes = generate_template().unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));

    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, "问卷类型,链接,状态,创建时间,使用时间,过期时间,报告ID");
}

#[test]
fn filled_template_imports_cleanly() {
    let h = common::harness();
    let file = ImportFile::new(TEMPLATE_FILE_NAME, generate_template().unwrap());

    let result = h.pipeline.run(&file, None).unwrap();

    assert_eq!(result.success, 1, "{:?}", result.errors);
    assert_eq!(h.links.load()[0].questionnaire_type, "SCL-90");
}
