//! Dispatch from published endpoints to entity-model accessors.
//!
//! Each call recovers the endpoint's [`Component`] context, invokes exactly
//! one driver accessor, and translates the result into the textual
//! read/write convention: reads are newline-terminated UTF-8, writes
//! report full consumption or a typed error. No business logic lives here,
//! and nothing here touches device lifecycle state.

use crate::enum_adapter::{list_items, match_item};
use crate::namespace::{Component, Endpoint};
use counterd_types::{Count, CountWriteValue, CounterError, CounterResult, Device, Synapse};

/// Reads one endpoint.
///
/// Fails with `Unsupported` if the endpoint has no read accessor.
pub fn read_endpoint(device: &Device, endpoint: &Endpoint) -> CounterResult<String> {
    if !endpoint.readable {
        return Err(CounterError::Unsupported);
    }
    match &endpoint.component {
        Component::SignalValue(signal) => {
            let read = device.ops.signal_read.as_ref().ok_or(CounterError::Unsupported)?;
            let level = read(signal)?;
            Ok(format!("{level}\n"))
        }
        Component::CountValue(count) => {
            let read = device.ops.count_read.as_ref().ok_or(CounterError::Unsupported)?;
            let value = read(count)?;
            Ok(format!("{value}\n"))
        }
        Component::CountFunction(count) => {
            let get = device.ops.function_get.as_ref().ok_or(CounterError::Unsupported)?;
            let index = get(count)?;
            let kind = count.functions.get(index).copied().ok_or_else(|| {
                CounterError::internal(format!(
                    "count {}: function index {index} out of range ({} modes)",
                    count.id,
                    count.functions.len()
                ))
            })?;
            count.set_function_index(index);
            Ok(format!("{kind}\n"))
        }
        Component::CountFunctionAvailable(count) => Ok(list_items(&count.functions)),
        Component::CountSynapses(count) => synapses_listing(count),
        Component::SynapseAction { count, synapse } => {
            let get = device.ops.action_get.as_ref().ok_or(CounterError::Unsupported)?;
            let index = get(count, synapse)?;
            let kind = synapse.actions.get(index).copied().ok_or_else(|| {
                CounterError::internal(format!(
                    "count {}: signal {}: action index {index} out of range ({} modes)",
                    count.id,
                    synapse.signal.id,
                    synapse.actions.len()
                ))
            })?;
            synapse.set_action_index(index);
            Ok(format!("{kind}\n"))
        }
        Component::SynapseActionAvailable(synapse) => Ok(list_items(&synapse.actions)),
        Component::SignalExtension { signal, ext } => {
            let read = ext.read.as_ref().ok_or(CounterError::Unsupported)?;
            read(signal)
        }
        Component::CountExtension { count, ext } => {
            let read = ext.read.as_ref().ok_or(CounterError::Unsupported)?;
            read(count)
        }
        Component::DeviceExtension(ext) => {
            let read = ext.read.as_ref().ok_or(CounterError::Unsupported)?;
            read(device)
        }
        Component::Name(name) => Ok(format!("{name}\n")),
        Component::Size(n) => Ok(format!("{n}\n")),
    }
}

/// Writes one endpoint; returns the number of bytes consumed (always the
/// full input on success).
///
/// Fails with `Unsupported` if the endpoint has no write accessor.
pub fn write_endpoint(device: &Device, endpoint: &Endpoint, buf: &str) -> CounterResult<usize> {
    if !endpoint.writable {
        return Err(CounterError::Unsupported);
    }
    match &endpoint.component {
        Component::CountValue(count) => {
            let write = device.ops.count_write.as_ref().ok_or(CounterError::Unsupported)?;
            write(count, CountWriteValue::new(buf))?;
            Ok(buf.len())
        }
        Component::CountFunction(count) => {
            let set = device.ops.function_set.as_ref().ok_or(CounterError::Unsupported)?;
            let index = match_item(&count.functions, buf)
                .ok_or_else(|| CounterError::not_found(buf.trim_end()))?;
            set(count, index)?;
            count.set_function_index(index);
            Ok(buf.len())
        }
        Component::SynapseAction { count, synapse } => {
            let set = device.ops.action_set.as_ref().ok_or(CounterError::Unsupported)?;
            let index = match_item(&synapse.actions, buf)
                .ok_or_else(|| CounterError::not_found(buf.trim_end()))?;
            set(count, synapse, index)?;
            synapse.set_action_index(index);
            Ok(buf.len())
        }
        Component::SignalExtension { signal, ext } => {
            let write = ext.write.as_ref().ok_or(CounterError::Unsupported)?;
            write(signal, buf)?;
            Ok(buf.len())
        }
        Component::CountExtension { count, ext } => {
            let write = ext.write.as_ref().ok_or(CounterError::Unsupported)?;
            write(count, buf)?;
            Ok(buf.len())
        }
        Component::DeviceExtension(ext) => {
            let write = ext.write.as_ref().ok_or(CounterError::Unsupported)?;
            write(device, buf)?;
            Ok(buf.len())
        }
        // Constant and listing endpoints are never writable.
        _ => Err(CounterError::Unsupported),
    }
}

/// One line per Synapse: signal id, signal name, cached current action.
fn synapses_listing(count: &Count) -> CounterResult<String> {
    let mut out = String::new();
    for synapse in &count.synapses {
        let action = current_action(count, synapse)?;
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            synapse.signal.id,
            synapse.signal.name.as_deref().unwrap_or(""),
            action
        ));
    }
    Ok(out)
}

fn current_action(count: &Count, synapse: &Synapse) -> CounterResult<&'static str> {
    synapse
        .current_action()
        .map(|a| a.as_str())
        .ok_or_else(|| {
            CounterError::internal(format!(
                "count {}: signal {}: cached action index {} out of range",
                count.id,
                synapse.signal.id,
                synapse.action_index()
            ))
        })
}
