mod common;

use common::*;
use gform_submit::{
    Element, Form, FormError, FormState, ParseError, SubmissionError, SubmitOptions, Value,
};
use serde_json::json;

/// 选择 Right 分支的答案
fn right_branch(element: &Element, _: usize, _: usize) -> Value {
    match element.name.as_deref() {
        Some("Name") => Value::text("Alice"),
        Some("Route") => Value::choice("Right"),
        Some("Colors") => Value::choices(["Red", "Green"]),
        _ => Value::Unchanged,
    }
}

async fn load_survey(transport: &MockTransport, page: String) -> Form {
    transport.push(200, VIEW_URL, page);
    Form::load(transport, VIEW_URL).await.expect("加载表单失败")
}

#[tokio::test]
async fn test_single_request_submission() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;
    form.fill(&mut right_branch).unwrap();

    transport.push(200, ACTION_URL, confirmation_page());
    let result = form
        .submit(&transport, SubmitOptions::default())
        .await
        .expect("提交失败");

    let posts = transport.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(result.requests, 1);

    let post = &posts[0];
    assert_eq!(post.url, ACTION_URL);
    assert_eq!(post.value("entry.101"), Some("Alice"));
    assert_eq!(post.value("entry.102"), Some("Right"));
    assert_eq!(post.values("entry.104"), vec!["Red", "Green"]);
    // 未经过的第 2 页和未填写的选填题不提交
    assert!(!post.has("entry.103"));
    assert!(!post.has("entry.105"));
    assert_eq!(post.value("fbzx"), Some(FBZX));
    assert_eq!(post.value("pageHistory"), Some("0,2"));
    assert_eq!(post.value("partialResponse"), Some(INITIAL_DRAFT));
    assert!(!post.has("continue"));
    assert!(!post.has("g-recaptcha-response"));

    assert_eq!(form.state(), FormState::Submitted);
    assert_eq!(
        result.resubmit.as_deref(),
        Some("https://docs.google.com/forms/d/e/FORM_ID/viewform?usp=form_confirm")
    );
    assert!(result.summary.is_some());
    assert!(result.edit.is_none());
}

#[tokio::test]
async fn test_emulated_history() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;
    form.fill(&mut right_branch).unwrap();

    let draft = r#"[[[null,101,["Alice"],0],[null,102,["Right"],0]],null,"-4242"]"#;
    transport.push(200, ACTION_URL, next_page("0,2", draft));
    transport.push(200, ACTION_URL, confirmation_page());

    let options = SubmitOptions {
        emulate_history: true,
        ..SubmitOptions::default()
    };
    let result = form.submit(&transport, options).await.expect("提交失败");

    let posts = transport.posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(result.requests, 2);

    let first = &posts[0];
    assert_eq!(first.value("continue"), Some("1"));
    assert_eq!(first.value("pageHistory"), Some("0"));
    assert_eq!(first.value("partialResponse"), Some(INITIAL_DRAFT));
    assert_eq!(first.value("entry.101"), Some("Alice"));
    assert!(!first.has("entry.104"));

    let last = &posts[1];
    assert!(!last.has("continue"));
    assert_eq!(last.value("pageHistory"), Some("0,2"));
    assert_eq!(last.value("partialResponse"), Some(draft));
    assert_eq!(last.values("entry.104"), vec!["Red", "Green"]);
    assert!(!last.has("entry.101"));
    assert_eq!(last.value("fbzx"), Some(FBZX));
}

#[tokio::test]
async fn test_unexpected_page() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;
    form.fill(&mut right_branch).unwrap();

    transport.push(200, ACTION_URL, next_page("0,1", INITIAL_DRAFT));
    let options = SubmitOptions {
        emulate_history: true,
        ..SubmitOptions::default()
    };
    let err = form.submit(&transport, options).await.unwrap_err();

    assert!(matches!(
        err,
        FormError::Submission(SubmissionError::UnexpectedPage {
            expected: 2,
            actual: Some(1)
        })
    ));
    assert_eq!(form.state(), FormState::Filled);
}

#[tokio::test]
async fn test_missing_token() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;
    form.fill(&mut right_branch).unwrap();

    transport.push(200, ACTION_URL, "<html><body>no inputs</body></html>");
    let options = SubmitOptions {
        emulate_history: true,
        ..SubmitOptions::default()
    };
    let err = form.submit(&transport, options).await.unwrap_err();
    assert!(matches!(
        err,
        FormError::Submission(SubmissionError::MissingToken { .. })
    ));
}

#[tokio::test]
async fn test_submit_requires_validation() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;

    let err = form
        .submit(&transport, SubmitOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FormError::Submission(SubmissionError::NotValidated)
    ));
    assert!(transport.posts().is_empty());
}

#[tokio::test]
async fn test_captcha_required() {
    let transport = MockTransport::new();
    // 收集邮箱（由回复者填写），始终发送回复副本
    let page = survey_page_with(json!([0, 0, 0, 3, null, 0, 3]));
    let mut form = load_survey(&transport, page).await;

    let mut strategy = |element: &Element, page: usize, index: usize| match element.kind {
        gform_submit::ElementKind::UserEmail(_) => Value::text("alice@example.com"),
        _ => right_branch(element, page, index),
    };
    form.fill(&mut strategy).unwrap();

    let err = form
        .submit(&transport, SubmitOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FormError::Submission(SubmissionError::CaptchaRequired)
    ));
    assert!(transport.posts().is_empty());

    transport.push(200, ACTION_URL, confirmation_page());
    let options = SubmitOptions {
        captcha_response: Some("token".to_string()),
        ..SubmitOptions::default()
    };
    form.submit(&transport, options).await.unwrap();

    let post = &transport.posts()[0];
    assert_eq!(post.value("g-recaptcha-response"), Some("token"));
    assert_eq!(post.value("emailAddress"), Some("alice@example.com"));
}

#[tokio::test]
async fn test_signin_required() {
    let transport = MockTransport::new();
    let page = survey_page_with(json!([0, 1, 0, 0, null, 0, 0]));
    let mut form = load_survey(&transport, page).await;
    form.fill(&mut right_branch).unwrap();

    let err = form
        .submit(&transport, SubmitOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FormError::Submission(SubmissionError::SigninRequired)
    ));
}

#[tokio::test]
async fn test_bad_status() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;
    form.fill(&mut right_branch).unwrap();

    transport.push(500, ACTION_URL, "");
    let err = form
        .submit(&transport, SubmitOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FormError::Submission(SubmissionError::BadStatus { status: 500, .. })
    ));
    assert_eq!(form.state(), FormState::Filled);
}

#[test]
fn test_load_errors() {
    tokio_test::block_on(async {
        let transport = MockTransport::new();

        transport.push(404, VIEW_URL, "");
        let err = Form::load(&transport, VIEW_URL).await.unwrap_err();
        assert!(matches!(err, FormError::Parse(ParseError::NoSuchForm { .. })));

        let closed = "https://docs.google.com/forms/d/e/FORM_ID/closedform";
        transport.push(200, closed, "<html><head><title>Survey</title></head></html>");
        let err = Form::load(&transport, VIEW_URL).await.unwrap_err();
        match err {
            FormError::Parse(ParseError::ClosedForm { title }) => assert_eq!(title, "Survey"),
            other => panic!("应该是表单已关闭: {:?}", other),
        }

        let err = Form::load(&transport, VIEW_URL).await.unwrap_err();
        assert!(matches!(err, FormError::Transport(_)));

        assert_eq!(transport.requests().len(), 3);
        assert!(transport.requests().iter().all(|r| r.method == "GET"));
    });
}

#[tokio::test]
async fn test_form_page_instead_of_confirmation() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;
    form.fill(&mut right_branch).unwrap();

    // 服务器拒绝提交时会重新返回表单页
    transport.push(200, ACTION_URL, next_page("0,2", INITIAL_DRAFT));
    let err = form
        .submit(&transport, SubmitOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FormError::Submission(SubmissionError::NotConfirmed { page: Some(2) })
    ));
    assert_eq!(form.state(), FormState::Filled);
}

#[tokio::test]
async fn test_emulated_history_requires_confirmation() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;
    form.fill(&mut right_branch).unwrap();

    transport.push(200, ACTION_URL, next_page("0,2", INITIAL_DRAFT));
    transport.push(200, ACTION_URL, next_page("0,2", INITIAL_DRAFT));
    let options = SubmitOptions {
        emulate_history: true,
        ..SubmitOptions::default()
    };
    let err = form.submit(&transport, options).await.unwrap_err();

    assert!(matches!(
        err,
        FormError::Submission(SubmissionError::NotConfirmed { .. })
    ));
    assert_eq!(transport.posts().len(), 2);
}

#[tokio::test]
async fn test_confirmation_without_links() {
    let transport = MockTransport::new();
    let mut form = load_survey(&transport, survey_page()).await;
    form.fill(&mut right_branch).unwrap();

    transport.push(200, ACTION_URL, "<html><body>已记录您的回复</body></html>");
    let result = form
        .submit(&transport, SubmitOptions::default())
        .await
        .expect("提交失败");

    assert_eq!(result.requests, 1);
    assert!(result.resubmit.is_none());
    assert!(result.summary.is_none());
    assert!(result.edit.is_none());
    assert!(result.quiz_score.is_none());
    assert_eq!(form.state(), FormState::Submitted);
}
