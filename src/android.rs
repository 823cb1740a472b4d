// JNI entry points for jp.buzza.androidgde.widget.NativeDragController
//
// The overlay service forwards every MotionEvent from the widget's touch
// listener here and applies the returned frame (see crate::bridge).

use jni::objects::JClass;
use jni::sys::{jfloat, jint, jintArray, jlong};
use jni::JNIEnv;
use log::info;

use crate::bridge;
use crate::config::AppConfig;
use crate::error::log_widget_error;
use crate::telemetry::{self, LifecyclePhase};
use crate::widget::Position;

/// JNI_OnLoad is called when the native library is loaded by Android
#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: jni::JavaVM, _reserved: *mut std::ffi::c_void) -> jint {
    crate::init_logging();
    info!("JNI_OnLoad called - floating widget core loaded");
    telemetry::init_hub(&AppConfig::load_android().telemetry);
    telemetry::hub().record_lifecycle(LifecyclePhase::LibraryLoaded);
    jni::sys::JNI_VERSION_1_6
}

/// Returns a controller handle, or 0 if the sizes are invalid
#[no_mangle]
pub extern "system" fn Java_jp_buzza_androidgde_widget_NativeDragController_nativeCreate(
    _env: JNIEnv,
    _class: JClass,
    screen_width: jint,
    screen_height: jint,
    widget_width: jint,
    widget_height: jint,
) -> jlong {
    let config = AppConfig::load_android();
    match bridge::create_controller(
        screen_width,
        screen_height,
        widget_width,
        widget_height,
        &config.gesture,
    ) {
        Ok(handle) => handle,
        Err(err) => {
            log_widget_error(&err, "nativeCreate");
            0
        }
    }
}

#[no_mangle]
pub extern "system" fn Java_jp_buzza_androidgde_widget_NativeDragController_nativeOnTouch(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    action: jint,
    raw_x: jfloat,
    raw_y: jfloat,
    position_x: jint,
    position_y: jint,
) -> jintArray {
    let frame = bridge::on_touch(
        handle,
        action,
        raw_x,
        raw_y,
        Position::new(position_x, position_y),
    )
    .unwrap_or_else(|err| bridge::error_frame(&err, "nativeOnTouch"));

    let array = match env.new_int_array(bridge::FRAME_LEN as i32) {
        Ok(array) => array,
        Err(err) => {
            log::error!("[JNI] Failed to allocate result frame: {}", err);
            return std::ptr::null_mut();
        }
    };
    if let Err(err) = env.set_int_array_region(&array, 0, &frame) {
        log::error!("[JNI] Failed to fill result frame: {}", err);
        return std::ptr::null_mut();
    }
    array.into_raw()
}

#[no_mangle]
pub extern "system" fn Java_jp_buzza_androidgde_widget_NativeDragController_nativeUpdateBounds(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    screen_width: jint,
    screen_height: jint,
    widget_width: jint,
    widget_height: jint,
) {
    if let Err(err) =
        bridge::update_bounds(handle, screen_width, screen_height, widget_width, widget_height)
    {
        log_widget_error(&err, "nativeUpdateBounds");
    }
}

#[no_mangle]
pub extern "system" fn Java_jp_buzza_androidgde_widget_NativeDragController_nativeDestroy(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if let Err(err) = bridge::destroy_controller(handle) {
        log_widget_error(&err, "nativeDestroy");
    }
}
