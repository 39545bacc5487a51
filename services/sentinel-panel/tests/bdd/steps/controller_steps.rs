//! BDD step definitions for the view controller feature

use cucumber::{given, then, when};

use sentinel_panel::identity::{NewOrg, NewUser};

use crate::world::PanelWorld;

#[given("a sentinel controller")]
fn sentinel_controller(world: &mut PanelWorld) {
    world.controller();
}

#[given(expr = "the controller has logged in as {string} with password {string}")]
async fn controller_has_logged_in(world: &mut PanelWorld, username: String, password: String) {
    let controller = world.controller();
    controller.set_credentials(username, password);
    controller.login().await;
    assert!(controller.authenticated().await, "controller login failed");
}

#[when(expr = "the controller logs in as {string} with password {string}")]
async fn controller_logs_in(world: &mut PanelWorld, username: String, password: String) {
    let controller = world.controller();
    controller.set_credentials(username, password);
    controller.login().await;
}

#[when("the controller logs out")]
async fn controller_logs_out(world: &mut PanelWorld) {
    world.controller().logout().await;
}

#[when("the controller fetches users")]
async fn controller_fetches_users(world: &mut PanelWorld) {
    world.controller().get_users().await;
}

#[when("the controller fetches organizations")]
async fn controller_fetches_orgs(world: &mut PanelWorld) {
    world.controller().get_orgs().await;
}

#[when(expr = "the controller shows user {string}")]
async fn controller_shows_user(world: &mut PanelWorld, user_id: String) {
    world.controller().get_user(&user_id).await;
}

#[when(expr = "the controller creates user {string} with password {string}")]
async fn controller_creates_user(world: &mut PanelWorld, username: String, password: String) {
    world
        .controller()
        .create_user(&NewUser::new(username, password))
        .await;
}

#[when(expr = "the controller creates organization {string}")]
async fn controller_creates_org(world: &mut PanelWorld, name: String) {
    world.controller().create_org(&NewOrg::new(name)).await;
}

#[when(expr = "the controller navigates to {string}")]
fn controller_navigates(world: &mut PanelWorld, path: String) {
    world.controller().path(&path);
}

#[then("the controller should be authenticated")]
async fn controller_authenticated(world: &mut PanelWorld) {
    assert!(world.controller().authenticated().await);
}

#[then("the controller should not be authenticated")]
async fn controller_not_authenticated(world: &mut PanelWorld) {
    let controller = world.controller();
    assert!(!controller.authenticated().await);
    assert!(controller.view().identity.is_none());
}

#[then(expr = "the current route should be {string}")]
fn current_route(world: &mut PanelWorld, path: String) {
    assert_eq!(world.controller().route().path(), path);
}

#[then(expr = "the controller identity API key should be {string}")]
fn controller_api_key(world: &mut PanelWorld, api_key: String) {
    let identity = world
        .controller()
        .view()
        .identity
        .clone()
        .expect("controller has no identity");
    assert_eq!(identity.api_key, api_key);
}

#[then(expr = "the error message should be {string}")]
fn error_message_is(world: &mut PanelWorld, expected: String) {
    assert_eq!(
        world.controller().view().err_msg.as_deref(),
        Some(expected.as_str())
    );
}

#[then(expr = "the error message should contain {string}")]
fn error_message_contains(world: &mut PanelWorld, expected: String) {
    let err_msg = world
        .controller()
        .view()
        .err_msg
        .clone()
        .expect("no error message set");
    assert!(err_msg.contains(&expected), "{err_msg}");
}

#[then("there should be no error message")]
fn no_error_message(world: &mut PanelWorld) {
    assert!(world.controller().view().err_msg.is_none());
}

#[then("the login form should be empty")]
fn login_form_empty(world: &mut PanelWorld) {
    let user = &world.controller().view().user;
    assert!(user.username.is_empty());
    assert!(user.password.is_none());
}

#[then("the typed password should be cleared")]
fn password_cleared(world: &mut PanelWorld) {
    assert!(world.controller().view().user.password.is_none());
}

#[then("the login should be marked as failed")]
fn login_marked_failed(world: &mut PanelWorld) {
    let view = world.controller().view();
    assert!(view.login_failed);
    assert!(view.user.password.is_none(), "password should be cleared");
}

#[then(expr = "the user message should be {string}")]
fn user_message(world: &mut PanelWorld, expected: String) {
    assert_eq!(
        world.controller().view().user_msg.as_deref(),
        Some(expected.as_str())
    );
}

#[then(expr = "the controller should list {int} users")]
fn controller_lists_users(world: &mut PanelWorld, count: usize) {
    assert_eq!(world.controller().view().users.len(), count);
}

#[then(expr = "the controller should show user {string}")]
fn controller_shows(world: &mut PanelWorld, username: String) {
    let user = world
        .controller()
        .view()
        .user_data
        .clone()
        .expect("no user detail in view");
    assert_eq!(user.username, username);
}
