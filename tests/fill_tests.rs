mod common;

use common::*;
use gform_submit::{
    AnswerSheet, DefaultStrategy, Element, ElementErrorKind, ElementKind, FillError, FillOptions,
    Form, FormError, FormState, Value,
};

fn survey() -> Form {
    Form::from_html(VIEW_URL, &survey_page()).expect("解析表单失败")
}

fn fill_errors(err: FormError) -> FillError {
    match err {
        FormError::Fill(err) => err,
        other => panic!("应该是填写错误: {:?}", other),
    }
}

#[test]
fn test_required_elements_without_value() {
    let mut form = survey();
    let mut empty = |_: &Element, _: usize, _: usize| Value::Empty;

    let err = fill_errors(form.fill(&mut empty).unwrap_err());
    let errors = err.errors();

    // Route 未选择时走默认跳转，第 2 页的必填题也要检查
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| e.kind == ElementErrorKind::Required));
    assert_eq!(
        errors.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        vec!["Name", "Route", "Details"]
    );
    assert_eq!(errors[2].page_index, 1);
    assert_eq!(errors[2].element_index, 0);
    assert_eq!(form.state(), FormState::Loaded);
}

#[test]
fn test_choice_outside_options() {
    let mut form = survey();
    let mut strategy = |element: &Element, _: usize, _: usize| match element.name.as_deref() {
        Some("Route") => Value::choice("Middle"),
        _ => Value::text("x"),
    };

    let err = fill_errors(form.fill(&mut strategy).unwrap_err());
    assert!(err.errors().iter().any(|e| e.kind
        == ElementErrorKind::InvalidChoice {
            value: "Middle".to_string()
        }));
}

#[test]
fn test_default_strategy() {
    let mut form = survey();
    form.fill(&mut DefaultStrategy).expect("默认值填写失败");

    assert_eq!(form.state(), FormState::Filled);
    // 默认选择第一个选项 Left
    assert_eq!(form.reachable_pages(), vec![0, 1]);
    for page in form.reachable_pages() {
        for element in &form.pages[page].elements {
            assert!(element.validate().is_ok());
            assert!(!element.is_empty());
        }
    }
    // 不可达页面不会被填写
    assert!(form.find_element(2, 0).unwrap().is_empty());
}

#[test]
fn test_branch_skips_unreachable_required() {
    let mut form = survey();
    let mut strategy = |element: &Element, _: usize, _: usize| match element.name.as_deref() {
        Some("Route") => Value::choice("Right"),
        Some("Colors") => Value::choices(["Red", "Purple"]),
        Some("Rating") => Value::Unchanged,
        _ => Value::text("Alice"),
    };

    form.fill(&mut strategy).expect("填写失败");
    assert_eq!(form.reachable_pages(), vec![0, 2]);
    assert!(form.find_element(1, 0).unwrap().is_empty());

    let ElementKind::Checkboxes(colors) = &form.find_element(2, 0).unwrap().kind else {
        panic!("Colors 应该是复选框");
    };
    assert_eq!(colors.selected(), ["Red".to_string()]);
    assert_eq!(colors.other_value(), Some("Purple"));
}

#[test]
fn test_fill_optional() {
    let mut form = survey();
    let mut strategy = |element: &Element, _: usize, _: usize| match element.name.as_deref() {
        Some("Route") => Value::choice("Right"),
        _ => Value::Default,
    };

    form.fill(&mut strategy).unwrap();
    assert!(form.find_element(2, 1).unwrap().is_empty());

    let options = FillOptions {
        fill_optional: true,
    };
    form.fill_with_options(&mut strategy, options).unwrap();
    assert!(!form.find_element(2, 1).unwrap().is_empty());
}

#[test]
fn test_set_value_and_validate() {
    let mut form = survey();
    form.fill(&mut DefaultStrategy).unwrap();

    form.set_value(0, 1, Value::choice("Right")).unwrap();
    assert_eq!(form.state(), FormState::Loaded);

    // 第 3 页的必填复选框尚未填写
    let err = fill_errors(form.validate().unwrap_err());
    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.errors()[0].name, "Colors");

    form.set_value(2, 0, Value::choices(["Green"])).unwrap();
    form.validate().unwrap();
    assert_eq!(form.state(), FormState::Filled);
}

#[test]
fn test_set_value_errors() {
    let mut form = survey();

    let err = fill_errors(form.set_value(9, 0, Value::Empty).unwrap_err());
    assert_eq!(
        err,
        FillError::NoSuchElement {
            page_index: 9,
            element_index: 0
        }
    );

    let err = fill_errors(form.set_value(0, 1, Value::choice("Middle")).unwrap_err());
    assert_eq!(err.errors()[0].element_id, 2);

    // 被拒绝的值不会覆盖已有答案
    form.set_value(0, 0, Value::text("Alice")).unwrap();
    assert!(form.set_value(0, 0, Value::Scale(3)).is_err());
    let ElementKind::Short(name) = &form.find_element(0, 0).unwrap().kind else {
        panic!("Name 应该是短文本");
    };
    assert_eq!(name.value(), Some("Alice"));
}

#[test]
fn test_rejected_value_keeps_state() {
    let mut form = survey();
    form.fill(&mut DefaultStrategy).unwrap();
    assert_eq!(form.state(), FormState::Filled);

    assert!(form.set_value(0, 1, Value::choice("Middle")).is_err());
    assert!(form.set_value(9, 0, Value::Empty).is_err());
    assert_eq!(form.state(), FormState::Filled);
}

#[test]
fn test_infinite_loop() {
    // 第 2 页的选项跳回第 2 页自身
    let data = serde_json::json!([null, ["", [
        [1, "Loop", null, 2, [[11, [["Next", null, -2]], 1]]],
        [100, "Second", null, 8, null, -2],
        [2, "Back", null, 2, [[12, [["Again", null, 100]], 1]]],
        [200, "Third", null, 8, null, -2]
    ]], null, "loop"]);
    let mut form = Form::from_html(VIEW_URL, &form_page(&data, "0", INITIAL_DRAFT)).unwrap();

    let err = fill_errors(form.fill(&mut DefaultStrategy).unwrap_err());
    assert!(matches!(err, FillError::InfiniteLoop { page: 1, .. }));
}

#[test]
fn test_answer_sheet() {
    let mut sheet = AnswerSheet::parse(
        r#"
[answers]
Name = "Alice"
Route = "Right"
Colors = ["Red", "Green"]
Rating = 3
"#,
    )
    .unwrap();

    let mut form = survey();
    form.fill(&mut sheet).expect("按答案文件填写失败");
    assert_eq!(form.reachable_pages(), vec![0, 2]);

    let ElementKind::Scale(rating) = &form.find_element(2, 1).unwrap().kind else {
        panic!("Rating 应该是量表");
    };
    assert_eq!(rating.selected(), Some("3"));
}

#[test]
fn test_answer_sheet_missing_answers() {
    let mut sheet = AnswerSheet::parse("[answers]\nName = \"Alice\"\n").unwrap();
    let mut form = survey();
    assert!(form.fill(&mut sheet).is_err());

    let mut sheet = sheet.with_fill_defaults(true);
    form.fill(&mut sheet).unwrap();
    assert_eq!(form.state(), FormState::Filled);
}
