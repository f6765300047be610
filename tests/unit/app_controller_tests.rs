/*!
 * Tests for the application controller surface
 */

use doctran::app_controller::Controller;

#[test]
fn test_new_for_test_shouldCreateInitializedController() {
    let controller = Controller::new_for_test().unwrap();
    assert!(controller.is_initialized());
}

#[tokio::test]
async fn test_run_withMissingInputPath_shouldFail() {
    let controller = Controller::new_for_test().unwrap();
    let result = controller.run("/definitely/not/a/real/path.docx", None, false).await;
    assert!(result.is_err());
}
