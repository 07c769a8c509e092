//! JNI exports for `org.operatorfoundation.audiocoder.CJarInterface`.
//!
//! Each export wraps one [`Bridge`] call. Failures raise
//! `java.lang.Exception` and return a null (or NaN) result.

use anyhow::Context;
use jni::objects::{JByteArray, JClass, JObject, JString, JValue};
use jni::sys::{jboolean, jbyteArray, jdouble, jint, jlongArray, jobjectArray, jstring, JNI_FALSE};
use jni::JNIEnv;
use log::error;

use crate::bridge::{self, Bridge};
use crate::modem::DecodedSpot;

const EXCEPTION_CLASS: &str = "java/lang/Exception";
const MESSAGE_CLASS: &str = "org/operatorfoundation/audiocoder/WSPRMessage";
/// `WSPRMessage(float snr, double freq, float dt, float drift, String message)`
const MESSAGE_CTOR: &str = "(FDFFLjava/lang/String;)V";

fn init_logging() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("AudioCoder"),
    );
    #[cfg(not(target_os = "android"))]
    let _ = env_logger::try_init();
}

/// Runs `f`, converting an error into a pending Java exception.
fn throwing<T>(env: &mut JNIEnv, fallback: T, f: impl FnOnce(&mut JNIEnv) -> anyhow::Result<T>) -> T {
    init_logging();
    match f(env) {
        Ok(v) => v,
        Err(e) => {
            error!("{e:#}");
            if env.throw_new(EXCEPTION_CLASS, format!("{e:#}")).is_err() {
                error!("failed to raise {EXCEPTION_CLASS}");
            }
            fallback
        }
    }
}

fn java_string(env: &mut JNIEnv, s: &JString) -> anyhow::Result<String> {
    Ok(env.get_string(s).context("reading java string")?.into())
}

fn spots_to_java(env: &mut JNIEnv, spots: &[DecodedSpot]) -> anyhow::Result<jobjectArray> {
    let class = env.find_class(MESSAGE_CLASS)?;
    let out = env.new_object_array(spots.len() as jint, &class, JObject::null())?;
    for (i, spot) in spots.iter().enumerate() {
        let text = env.new_string(&spot.message)?;
        let obj = env.new_object(
            &class,
            MESSAGE_CTOR,
            &[
                JValue::Float(spot.snr),
                JValue::Double(spot.freq),
                JValue::Float(spot.dt),
                JValue::Float(spot.drift),
                JValue::Object(&text),
            ],
        )?;
        env.set_object_array_element(&out, i as jint, obj)?;
    }
    Ok(out.into_raw())
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_org_operatorfoundation_audiocoder_CJarInterface_WSPREncodeToPCM<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    callsign: JString<'local>,
    locator: JString<'local>,
    power: jint,
    offset: jint,
    lsb: jboolean,
) -> jbyteArray {
    throwing(&mut env, std::ptr::null_mut(), |env| {
        let call = java_string(env, &callsign)?;
        let loc = java_string(env, &locator)?;
        let bytes = Bridge::default().encode_to_pcm(&call, &loc, power, offset, lsb != JNI_FALSE)?;
        Ok(env.byte_array_from_slice(&bytes)?.into_raw())
    })
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_org_operatorfoundation_audiocoder_CJarInterface_WSPREncodeToFrequencies<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    callsign: JString<'local>,
    locator: JString<'local>,
    power: jint,
    offset: jint,
    lsb: jboolean,
) -> jlongArray {
    throwing(&mut env, std::ptr::null_mut(), |env| {
        let call = java_string(env, &callsign)?;
        let loc = java_string(env, &locator)?;
        let freqs =
            Bridge::default().encode_to_frequencies(&call, &loc, power, offset, lsb != JNI_FALSE)?;
        let out = env.new_long_array(freqs.len() as jint)?;
        env.set_long_array_region(&out, 0, &freqs)?;
        Ok(out.into_raw())
    })
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_org_operatorfoundation_audiocoder_CJarInterface_WSPRDecodeFromPcm<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    sound: JByteArray<'local>,
    dial_freq: jdouble,
    lsb: jboolean,
) -> jobjectArray {
    throwing(&mut env, std::ptr::null_mut(), |env| {
        let bytes = env.convert_byte_array(&sound)?;
        let spots = Bridge::default().decode_from_pcm(&bytes, dial_freq, lsb != JNI_FALSE)?;
        spots_to_java(env, &spots)
    })
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_org_operatorfoundation_audiocoder_CJarInterface_WSPRNhash<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    callsign: JString<'local>,
) -> jint {
    throwing(&mut env, 0, |env| {
        let call = java_string(env, &callsign)?;
        Ok(Bridge::default().nhash(&call))
    })
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_org_operatorfoundation_audiocoder_CJarInterface_WSPRLatLonToGSQ<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    lat: jdouble,
    lon: jdouble,
) -> jstring {
    throwing(&mut env, std::ptr::null_mut(), |env| {
        let gsq = bridge::lat_lon_to_gsq(lat, lon)?;
        Ok(env.new_string(gsq)?.into_raw())
    })
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_org_operatorfoundation_audiocoder_CJarInterface_WSPRGetDistanceBetweenLocators<
    'local,
>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    a: JString<'local>,
    b: JString<'local>,
) -> jdouble {
    throwing(&mut env, f64::NAN, |env| {
        let a = java_string(env, &a)?;
        let b = java_string(env, &b)?;
        Ok(bridge::locator_distance_km(&a, &b)?)
    })
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_org_operatorfoundation_audiocoder_CJarInterface_radioCheck<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    x: jint,
) -> jint {
    bridge::radio_check(x)
}
