//! End-to-end flows through the core components with in-memory storage.

use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rcloud_core::auth::{AuthForms, LoginForm, RegisterForm};
use rcloud_core::header::{Avatar, HeaderRenderer, HeaderView};
use rcloud_core::ink::{
    InkBurstEffect, InkBurstLayer, IntersectionEntry, LayerChange, Point, SectionRect,
};
use rcloud_core::profile::{KeyListView, KeyRow, ProfileInit, init_profile};
use rcloud_core::rng::{SequenceRandom, Xorshift64};
use rcloud_core::subscriptions::{EventKind, Subscriptions};
use rcloud_core::visual::{FrameRequest, ScrollMetrics, ScrollVisualEngine, ViewportEvent};
use rcloud_core::welcome::{WelcomeView, welcome_view};
use rcloud_core::{
    LocalUserStore, MediaPreferences, MemoryStorage, Route, SiteConfig, UserStore,
};

fn shared_store() -> Rc<LocalUserStore<MemoryStorage>> {
    Rc::new(LocalUserStore::new(MemoryStorage::new(), "rc_auth_user"))
}

fn entering(rect: SectionRect) -> IntersectionEntry {
    IntersectionEntry {
        is_intersecting: true,
        rect,
    }
}

#[test]
fn register_shows_initials_and_welcome() {
    let config = SiteConfig::default();
    let store = shared_store();
    let forms = AuthForms::new(Rc::clone(&store));
    let header = HeaderRenderer::new(Rc::clone(&store), config.routes.clone());

    assert!(!header.render().is_signed_in());

    let next = forms
        .submit_register(RegisterForm {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "hunter2".into(),
            company: String::new(),
        })
        .unwrap();
    assert_eq!(next, Route::Welcome);

    let stored = store.load().unwrap();
    assert_eq!(stored.full_name.as_deref(), Some("Ada Lovelace"));
    match header.render() {
        HeaderView::SignedIn {
            avatar, greeting, ..
        } => {
            assert_eq!(avatar, Avatar::Initials("AL".into()));
            assert_eq!(greeting, "Ada");
        }
        other => panic!("expected signed-in header, got {other:?}"),
    }
    assert_eq!(
        welcome_view(&store),
        WelcomeView::Greet("Ada Lovelace".into())
    );
}

#[test]
fn login_derives_name_from_email() {
    let store = shared_store();
    let forms = AuthForms::new(Rc::clone(&store));
    let next = forms
        .submit_login(LoginForm {
            email: "grace@example.com".into(),
            password: String::new(),
        })
        .unwrap();
    assert_eq!(next, Route::Profile);

    let stored = store.load().unwrap();
    assert_eq!(stored.full_name.as_deref(), Some("grace"));
    assert_eq!(stored.email.as_deref(), Some("grace@example.com"));
}

#[test]
fn logout_returns_to_signed_out_header() {
    let config = SiteConfig::default();
    let store = shared_store();
    AuthForms::new(Rc::clone(&store))
        .submit_login(LoginForm {
            email: "grace@example.com".into(),
            password: String::new(),
        })
        .unwrap();
    let header = HeaderRenderer::new(Rc::clone(&store), config.routes.clone());
    assert!(header.render().is_signed_in());

    assert_eq!(header.logout().unwrap(), Route::Index);
    assert_eq!(
        header.render(),
        HeaderView::SignedOut {
            sign_in_href: "./login.html".into(),
            sign_up_href: "./register.html".into(),
        }
    );
    assert_eq!(welcome_view(&store), WelcomeView::Redirect(Route::Register));
}

#[test]
fn generate_two_keys_then_revoke_first() {
    let config = SiteConfig::default();
    let store = shared_store();
    AuthForms::new(Rc::clone(&store))
        .submit_login(LoginForm {
            email: "grace@example.com".into(),
            password: String::new(),
        })
        .unwrap();

    let ProfileInit::Active(mut session) = init_profile(Rc::clone(&store), true, &config) else {
        panic!("stored user should activate the profile view");
    };
    let mut rng = Xorshift64::new(2024);
    session.generate_key(&mut rng).unwrap();
    session.generate_key(&mut rng).unwrap();
    let second = session.keys()[1].clone();
    assert_ne!(session.keys()[0], second);

    session.revoke_key(0).unwrap();
    assert_eq!(
        session.key_list(),
        KeyListView::Keys(vec![KeyRow {
            index: 0,
            text: second.clone(),
        }])
    );
    assert_eq!(store.load().unwrap().keys, vec![second]);
}

#[test]
fn profile_without_user_redirects_to_login() {
    let store = shared_store();
    let init = init_profile(Rc::clone(&store), true, &SiteConfig::default());
    assert!(matches!(init, ProfileInit::Redirect(Route::Login)));
}

#[test]
fn profile_delete_then_header_signs_out() {
    let config = SiteConfig::default();
    let store = shared_store();
    AuthForms::new(Rc::clone(&store))
        .submit_login(LoginForm {
            email: "grace@example.com".into(),
            password: String::new(),
        })
        .unwrap();
    let ProfileInit::Active(mut session) = init_profile(Rc::clone(&store), true, &config) else {
        panic!("stored user should activate the profile view");
    };
    let effects = session.delete_account(true).unwrap();
    assert_eq!(effects.navigate, Some(Route::Register));

    let header = HeaderRenderer::new(Rc::clone(&store), config.routes);
    assert!(!header.render().is_signed_in());
}

#[test]
fn reduced_motion_skips_scroll_and_bursts() {
    let prefs = MediaPreferences::new(false, true);
    let mut subs = Subscriptions::new();

    let mut engine = ScrollVisualEngine::new(prefs);
    engine.attach(&mut subs);
    assert!(!subs.contains(EventKind::Scroll));
    assert!(subs.contains(EventKind::Resize));
    assert_eq!(engine.handle(ViewportEvent::Scroll), FrameRequest::Ignored);

    let mut layer = InkBurstLayer::new(InkBurstEffect::new(prefs, SiteConfig::default().timings));
    layer.effect_mut().attach(&mut subs);
    let mut rng = SequenceRandom::new([0.9]);
    for _ in 0..10 {
        let changes = layer.on_intersection(
            entering(SectionRect::new(0.0, 0.0, 800.0, 600.0)),
            [240.0, 220.0, 200.0],
            prefs,
            &mut rng,
        );
        assert!(changes.is_empty());
    }
    assert!(layer.live().is_empty());
    assert_eq!(layer.pending_timers(), 0);
    assert_eq!(
        layer
            .effect()
            .spawn(Point { x: 1.0, y: 1.0 }, [240.0, 220.0, 200.0], prefs, &mut rng),
        None
    );
}

#[test]
fn burst_lifecycle_with_duplicate() {
    let prefs = MediaPreferences::desktop();
    let mut subs = Subscriptions::new();
    let mut layer = InkBurstLayer::new(InkBurstEffect::new(prefs, SiteConfig::default().timings));
    layer.effect_mut().attach(&mut subs);
    // Every sample above 0.5 so the duplicate gate opens.
    let mut rng = SequenceRandom::new([0.75]);
    let hues = [240.0, 220.0, 200.0];

    let added = layer.on_intersection(
        entering(SectionRect::new(0.0, 100.0, 1000.0, 500.0)),
        hues,
        prefs,
        &mut rng,
    );
    assert_eq!(added.len(), 1);
    assert_eq!(layer.live().len(), 1);

    let dup = layer.advance(Duration::from_millis(180), hues, prefs, &mut rng);
    assert!(matches!(dup.as_slice(), [LayerChange::Added(..)]));
    assert_eq!(layer.live().len(), 2);

    let first_gone = layer.advance(Duration::from_millis(1420), hues, prefs, &mut rng);
    assert!(matches!(first_gone.as_slice(), [LayerChange::Removed(..)]));

    let second_gone = layer.advance(Duration::from_millis(180), hues, prefs, &mut rng);
    assert!(matches!(second_gone.as_slice(), [LayerChange::Removed(..)]));
    assert!(layer.live().is_empty());
    assert_eq!(layer.pending_timers(), 0);
}

#[test]
fn scroll_burst_is_coalesced_into_one_frame() {
    let prefs = MediaPreferences::desktop();
    let mut subs = Subscriptions::new();
    let mut engine = ScrollVisualEngine::new(prefs);
    engine.attach(&mut subs);

    assert_eq!(engine.handle(ViewportEvent::Scroll), FrameRequest::Schedule);
    for _ in 0..20 {
        assert_eq!(engine.handle(ViewportEvent::Scroll), FrameRequest::Coalesced);
    }
    let state = engine.on_frame(ScrollMetrics::new(500.0, 2000.0, 1000.0), prefs);
    assert!(!engine.frame_pending());
    assert!((state.offset1 - 70.0).abs() < 1e-9);
    assert_eq!(engine.handle(ViewportEvent::Resize), FrameRequest::Schedule);
}
