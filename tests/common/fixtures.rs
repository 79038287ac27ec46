//! Manifests shared by the integration tests.

/// A CustomResourceDefinition with two served versions.
pub const ETCD_RESTORE_CRD: &str = r#"{"apiVersion":"apiextensions.k8s.io/v1beta1","kind":"CustomResourceDefinition","metadata":{"name":"etcdrestores.etcd.database.coreos.com"},"spec":{"group":"etcd.database.coreos.com","names":{"kind":"EtcdRestore","listKind":"EtcdRestoreList","plural":"etcdrestores","singular":"etcdrestore"},"scope":"Namespaced",    "versions": [
      {
        "name": "v1beta1",
        "served": true,
        "storage": true,
        "schema": {
          "openAPIV3Schema": {
            "type": "object",
            "properties": {
              "host": { "type": "string" },
              "port": { "type": "string" }
            }
          }
        }
      },
      {
        "name": "v1",
        "served": true,
        "storage": false,
        "schema": {
          "openAPIV3Schema": {
            "type": "object",
            "properties": {
              "host": { "type": "string" },
              "port": { "type": "string" }
            }
          }
        }
      }
    ]}}"#;

/// A namespace labelled for an addon, carrying a metadata template annotation.
pub const LABELLED_NAMESPACE: &str = r#"{"apiVersion":"v1","kind":"Namespace","metadata":{"annotations":{"discovery.addons.x-k8s.io/my.friendly.id":"{\"namespace\": \"metadata.name\"}"},"creationTimestamp":"2020-02-17T23:56:02Z","labels":{"discovery.addons.x-k8s.io/ghost-7v5lw":""},"name":"ns-nr8wl","resourceVersion":"54","selfLink":"/api/v1/namespaces/ns-nr8wl","uid":"a85bedf8-5e03-43ba-9d42-1c9cb40c80e0"},"spec":{"finalizers":["kubernetes"]},"status":{"phase":"Active"}}"#;

/// A service with several ports, for multi-field expansion.
pub const SERVICE: &str = r#"{
  "apiVersion": "v1",
  "kind": "Service",
  "metadata": {
    "name": "web",
    "namespace": "shop",
    "annotations": {
      "discovery.addons.x-k8s.io/endpoint": "{\"host\": \"metadata.name\", \"port\": \"spec.ports.#.port\", \"protocol\": \"spec.ports.#.protocol\"}"
    }
  },
  "spec": {
    "ports": [
      { "name": "http", "port": 80, "protocol": "TCP" },
      { "name": "dns", "port": 53, "protocol": "UDP" }
    ]
  }
}"#;
