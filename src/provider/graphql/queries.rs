//! GraphQL documents sent to the provider.

pub const HUBS: &str = r"
query GetHubs {
  hubs {
    results { id name }
  }
}";

pub const PROJECTS: &str = r"
query GetProjects($hubId: ID!) {
  projects(hubId: $hubId) {
    results { id name }
  }
}";

pub const FOLDERS_BY_PROJECT: &str = r"
query GetFoldersByProject($projectId: ID!, $cursor: String) {
  foldersByProject(projectId: $projectId, pagination: { cursor: $cursor }) {
    pagination { cursor pageSize }
    results { id name objectCount }
  }
}";

pub const ITEMS_BY_PROJECT: &str = r"
query GetItemsByProject($projectId: ID!) {
  itemsByProject(projectId: $projectId) {
    results { __typename id name }
  }
}";

pub const ITEMS_BY_FOLDER: &str = r"
query GetItemsByFolder($hubId: ID!, $folderId: ID!) {
  itemsByFolder(hubId: $hubId, folderId: $folderId) {
    results { __typename id name }
  }
}";

pub const PROJECT_IDS: &str = r"
query GetProjectId($hubName: String!, $projectName: String!) {
  hubs(filter: { name: $hubName }) {
    results {
      projects(filter: { name: $projectName }) {
        results { id }
      }
    }
  }
}";

pub const COMPONENT_VERSION_IDS: &str = r"
query GetComponentVersionId($projectId: ID!, $componentName: String!) {
  project(projectId: $projectId) {
    items(filter: { name: $componentName }) {
      results {
        ... on DesignItem {
          tipRootComponentVersion { id }
        }
      }
    }
  }
}";

pub const OCCURRENCES: &str = r"
query GetHierarchy($componentVersionId: ID!, $cursor: String) {
  componentVersion(componentVersionId: $componentVersionId) {
    id
    name
    allOccurrences(pagination: { cursor: $cursor }) {
      results {
        parentComponentVersion { id }
        componentVersion { id name }
      }
      pagination { cursor }
    }
  }
}";
